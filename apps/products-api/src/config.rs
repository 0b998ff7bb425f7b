//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Deadline for one catalog call (row and count query together)
    pub query_timeout: Option<Duration>,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        // 0 disables the deadline
        let query_timeout_ms: u64 = env_parse("PRODUCTS_QUERY_TIMEOUT_MS", 5_000)?;
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", 30)?;

        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            query_timeout: (query_timeout_ms > 0).then(|| Duration::from_millis(query_timeout_ms)),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
        })
    }
}
