//! Products API - read-only catalog over PostgreSQL

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::connect_from_config_with_retry;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.database.max_connections,
        "Connecting to PostgreSQL"
    );
    let db = connect_from_config_with_retry(config.database.clone(), None).await?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(
        port = state.config.server.port,
        query_timeout = ?state.config.query_timeout,
        "Starting Products API"
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        state.config.shutdown_timeout,
        async move {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = db.close().await {
                tracing::warn!("Failed to close PostgreSQL pool: {}", e);
            }
        },
    )
    .await?;

    info!("Products API shutdown complete");
    Ok(())
}
