use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, FromQueryResult};
use tracing::{Span, field, instrument};

use crate::{
    error::{ProductError, ProductResult},
    models::{CategoryRef, Product, ProductImage, ProductPage, ProductSummary},
    options::ListOptions,
    query::{get_statement, plan_list},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository using SeaORM raw statements
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn category(id: Option<i64>, name: Option<String>) -> Option<CategoryRef> {
    match (id, name) {
        (Some(id), Some(name)) => Some(CategoryRef { id, name }),
        _ => None,
    }
}

#[derive(Debug, FromQueryResult)]
struct ProductSummaryRow {
    id: i64,
    name: String,
    price: f64,
    created_at: DateTime<Utc>,
    category_id: Option<i64>,
    category_name: Option<String>,
    image_url: Option<String>,
    image_alt_text: Option<String>,
    average_rating: f64,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        ProductSummary {
            id: row.id,
            name: row.name,
            price: row.price,
            created_at: row.created_at,
            category_data: category(row.category_id, row.category_name),
            image: row.image_url.map(|url| ProductImage {
                url,
                alt_text: row.image_alt_text,
            }),
            average_rating: row.average_rating,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    created_at: DateTime<Utc>,
    category_id: Option<i64>,
    category_name: Option<String>,
    images: serde_json::Value,
    average_rating: f64,
}

impl TryFrom<ProductRow> for Product {
    type Error = ProductError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let images: Vec<ProductImage> = serde_json::from_value(row.images).map_err(|e| {
            ProductError::Internal(format!("Malformed images for product {}: {}", row.id, e))
        })?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            created_at: row.created_at,
            category_data: category(row.category_id, row.category_name),
            images,
            average_rating: row.average_rating,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self), fields(product_id = id))]
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let row = ProductRow::find_by_statement(get_statement(id))
            .one(&self.db)
            .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self, options), fields(limit = field::Empty, total_count = field::Empty))]
    async fn list(&self, options: ListOptions) -> ProductResult<ProductPage> {
        let plan = plan_list(&options);
        Span::current().record("limit", plan.limit);

        let rows = ProductSummaryRow::find_by_statement(plan.rows)
            .all(&self.db)
            .await?;

        let total_count = CountRow::find_by_statement(plan.count)
            .one(&self.db)
            .await?
            .map(|row| row.total.max(0) as u64)
            .unwrap_or(0);
        Span::current().record("total_count", total_count);

        let products = rows.into_iter().map(ProductSummary::from).collect();
        Ok(ProductPage::new(products, total_count, plan.limit, plan.sort.field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Filters, SortField, SortOrder};
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Transaction, Value};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn created(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    fn summary_row(id: i64, price: f64, day: u32, with_image: bool) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", id.into()),
            ("name", format!("Product {id}").into()),
            ("price", price.into()),
            ("created_at", created(day).into()),
            ("category_id", Some(3_i64).into()),
            ("category_name", Some("Electronics".to_string()).into()),
            (
                "image_url",
                with_image
                    .then(|| format!("https://cdn.example.com/{id}.png"))
                    .into(),
            ),
            ("image_alt_text", Option::<String>::None.into()),
            ("average_rating", 3.67_f64.into()),
        ])
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("total", total.into())])
    }

    #[tokio::test]
    async fn test_list_maps_rows_and_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                summary_row(12, 9.5, 3, true),
                summary_row(4, 12.0, 2, false),
            ]])
            .append_query_results([vec![count_row(7)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let page = repo
            .list(
                ListOptions::default()
                    .sorted_by(SortField::Price, SortOrder::Asc)
                    .with_limit(2),
            )
            .await
            .unwrap();

        assert_eq!(page.products.len(), 2);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.limit, 2);
        assert_eq!(
            page.products[0].category_data,
            Some(CategoryRef {
                id: 3,
                name: "Electronics".to_string()
            })
        );
        assert_eq!(
            page.products[0].image.as_ref().map(|i| i.url.as_str()),
            Some("https://cdn.example.com/12.png")
        );
        assert_eq!(page.products[1].image, None);
        assert_eq!(page.next_cursor, Some(vec!["12".to_string(), "4".to_string()]));
    }

    #[tokio::test]
    async fn test_list_issues_row_query_then_count_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([vec![count_row(0)]])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let options = ListOptions::default().with_filters(Filters {
            price_min: Some(50.0),
            min_rating: Some(4),
            ..Default::default()
        });
        let page = repo.list(options.clone()).await.unwrap();

        assert!(page.products.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.next_cursor, None);

        let plan = plan_list(&options);
        let log = db.into_transaction_log();
        assert_eq!(
            log,
            vec![
                Transaction::one(plan.rows),
                Transaction::one(plan.count),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_propagates_store_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![summary_row(1, 1.0, 1, false)]])
            .append_query_errors([DbErr::Custom("count failed".into())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let err = repo.list(ListOptions::default()).await.unwrap_err();
        assert!(matches!(err, ProductError::Database(msg) if msg.contains("count failed")));
    }

    #[tokio::test]
    async fn test_get_by_id_decodes_images() {
        let row = BTreeMap::from([
            ("id", Value::from(5_i64)),
            ("name", "Stealth Drone Pro".into()),
            ("description", "Quiet quadcopter".into()),
            ("price", 799.0_f64.into()),
            ("created_at", created(5).into()),
            ("category_id", Option::<i64>::None.into()),
            ("category_name", Option::<String>::None.into()),
            (
                "images",
                json!([
                    {"url": "https://cdn.example.com/5a.png", "alt_text": "top"},
                    {"url": "https://cdn.example.com/5b.png", "alt_text": null}
                ])
                .into(),
            ),
            ("average_rating", 4.333333_f64.into()),
        ]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.get_by_id(5).await.unwrap().unwrap();
        assert_eq!(product.category_data, None);
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[0].alt_text.as_deref(), Some("top"));
        assert_eq!(product.images[1].alt_text, None);
        assert_eq!(product.average_rating, 4.333333);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.get_by_id(404).await.unwrap().is_none());
    }
}
