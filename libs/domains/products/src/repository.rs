use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{Product, ProductPage};
use crate::options::ListOptions;

/// Read-only access to the product catalog
///
/// Implementations translate [`ListOptions`] into queries against their store;
/// the PostgreSQL one lives in [`crate::postgres`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Get one full product record, `None` when the id does not exist
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// One page of condensed records plus the filter-wide total
    async fn list(&self, options: ListOptions) -> ProductResult<ProductPage>;
}
