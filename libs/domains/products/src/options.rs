//! Normalized listing options handed to the query engine.
//!
//! Values in here are already range- and type-checked (see [`crate::validation`]);
//! the engine trusts them and only applies defaults.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Page size used when the caller supplies none or a non-positive one.
pub const DEFAULT_LIMIT: u64 = 20;

/// Column a product listing can be ordered by
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    Price,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Qualified column the field maps to in the listing query
    pub fn column(self) -> &'static str {
        match self {
            SortField::Price => "p.price",
            SortField::CreatedAt => "p.created_at",
        }
    }
}

/// Sort direction
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Row-comparison operator selecting rows strictly after a keyset boundary
    pub fn after_operator(self) -> &'static str {
        match self {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        }
    }
}

/// Optional row filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Case-insensitive substring matched against name and description
    pub search: Option<String>,
    /// Minimum average rating (1-5)
    pub min_rating: Option<i32>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.price_min.is_none()
            && self.price_max.is_none()
            && self.search.is_none()
            && self.min_rating.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Page size plus the raw keyset cursor components.
///
/// The cursor is kept undecoded here: its meaning depends on the sort field,
/// and a cursor of the wrong shape simply falls back to the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub cursor: Option<Vec<String>>,
}

impl Pagination {
    pub fn effective_limit(&self) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => limit as u64,
            _ => DEFAULT_LIMIT,
        }
    }
}

/// Everything a listing call can ask for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub filters: Filters,
    pub sort: Sort,
    pub pagination: Pagination,
}

impl ListOptions {
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Sort::new(field, order);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    pub fn after<I, S>(mut self, cursor: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pagination.cursor = Some(cursor.into_iter().map(Into::into).collect());
        self
    }
}
