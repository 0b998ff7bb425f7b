//! Products Domain
//!
//! Read-only product catalog backed by PostgreSQL: filtered, sorted and
//! cursor-paginated listings plus single-product lookups.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Not-found mapping, query deadline
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + PostgreSQL implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Query    │  ← Predicates, keyset cursor, SQL assembly
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, PgProductRepository, ProductService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/catalog").await?;
//!
//! let repository = PgProductRepository::new(db);
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod error;
pub mod handlers;
pub mod models;
pub mod options;
pub mod postgres;
pub mod predicate;
pub mod query;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use cursor::{Cursor, CursorValue};
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CategoryRef, Product, ProductImage, ProductPage, ProductSummary};
pub use options::{Filters, ListOptions, Pagination, Sort, SortField, SortOrder};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
pub use validation::{ListProductsQuery, Violation, Violations};
