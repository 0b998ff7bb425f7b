pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product 42 not found"
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation failures, keyed by query parameter name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::ValidationError(e) => {
                let code = ErrorCode::ValidationError;
                tracing::info!(error_code = code.code(), "Validation error: {}", e);
                (
                    code,
                    code.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                )
            }
            AppError::NotFound(msg) => {
                let code = ErrorCode::NotFound;
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                (code, msg, None)
            }
            // Driver messages stay in the logs
            AppError::Database(msg) => {
                let code = ErrorCode::DatabaseError;
                tracing::error!(error_code = code.code(), "Database error: {}", msg);
                (code, code.default_message().to_string(), None)
            }
            AppError::InternalServerError(msg) => {
                let code = ErrorCode::InternalError;
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (code, code.default_message().to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                let code = ErrorCode::ServiceUnavailable;
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (code, msg, None)
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}
