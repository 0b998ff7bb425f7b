//! Product Service - query orchestration layer

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductPage};
use crate::options::ListOptions;
use crate::repository::ProductRepository;

/// Product service providing the catalog read operations
///
/// The service maps missing products to [`ProductError::NotFound`] and bounds
/// every repository call with an optional deadline.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    query_timeout: Option<Duration>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            query_timeout: None,
        }
    }

    /// Fail calls that take longer than `timeout` with [`ProductError::Timeout`]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    async fn bounded<T>(&self, call: impl Future<Output = ProductResult<T>>) -> ProductResult<T> {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProductError::Timeout(limit))?,
            None => call.await,
        }
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.bounded(self.repository.get_by_id(id))
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List one page of products
    #[instrument(skip(self))]
    pub async fn list_products(&self, options: ListOptions) -> ProductResult<ProductPage> {
        let page = self.bounded(self.repository.list(options)).await?;
        tracing::debug!(
            returned = page.products.len(),
            total_count = page.total_count,
            "Listed products"
        );
        Ok(page)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            query_timeout: self.query_timeout,
        }
    }
}
