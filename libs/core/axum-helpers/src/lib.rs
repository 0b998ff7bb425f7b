//! # Axum Helpers
//!
//! Shared HTTP plumbing for the service binaries.
//!
//! - **[`errors`]**: [`AppError`] and the JSON error envelope
//! - **[`server`]**: router assembly, health checks, graceful shutdown

pub mod errors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};
