use std::time::Duration;

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::Violations;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(Violations),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(violations) => AppError::ValidationError(violations.into()),
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Timeout(after) => {
                AppError::ServiceUnavailable(format!("Query timed out after {:?}", after))
            }
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<Violations> for ProductError {
    fn from(violations: Violations) -> Self {
        ProductError::Validation(violations)
    }
}
