//! Products API routes

use axum::Router;
use domain_products::{PgProductRepository, ProductService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = match state.config.query_timeout {
        Some(timeout) => ProductService::new(repository).with_query_timeout(timeout),
        None => ProductService::new(repository),
    };
    handlers::router(service)
}
