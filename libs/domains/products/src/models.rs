use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cursor::Cursor;
use crate::options::SortField;

/// Category a product belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Product image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub url: String,
    /// Alternative text for accessibility
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Condensed product record returned by listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub category_data: Option<CategoryRef>,
    /// First image by image id; serialized as `{}` when the product has none
    #[serde(with = "image_or_empty")]
    #[schema(value_type = Object)]
    pub image: Option<ProductImage>,
    /// Average score rounded to two decimals, 0 without ratings
    pub average_rating: f64,
}

/// Full product record returned by the single-item fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub category_data: Option<CategoryRef>,
    /// All images ordered by image id
    pub images: Vec<ProductImage>,
    /// Unrounded average score, 0 without ratings
    pub average_rating: f64,
}

/// One page of a product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    /// Rows matching the filters, regardless of pagination
    pub total_count: u64,
    pub total_pages: u64,
    pub limit: u64,
    /// Cursor resuming after the last row; only set when the page is full
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Vec<String>>,
}

impl ProductPage {
    pub fn new(products: Vec<ProductSummary>, total_count: u64, limit: u64, sort: SortField) -> Self {
        let next_cursor = if limit > 0 && products.len() as u64 == limit {
            products
                .last()
                .map(|last| Cursor::after(last, sort).encode().to_vec())
        } else {
            None
        };

        Self {
            products,
            total_count,
            total_pages: total_pages(total_count, limit),
            limit,
            next_cursor,
        }
    }
}

/// `ceil(total / limit)`, 0 when there is nothing to page through
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

mod image_or_empty {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ProductImage;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Image(ProductImage),
        Empty {},
    }

    #[derive(Serialize)]
    struct Empty {}

    pub fn serialize<S: Serializer>(
        image: &Option<ProductImage>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match image {
            Some(image) => image.serialize(serializer),
            None => Empty {}.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ProductImage>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Image(image) => Some(image),
            Repr::Empty {} => None,
        })
    }
}
