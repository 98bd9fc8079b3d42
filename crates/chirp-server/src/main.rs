//! Server entry point for the chirp backend.
//!
//! Wires the pieces together: loads configuration from the environment,
//! constructs either the in-memory or the `PostgreSQL` store realization,
//! builds the service state, and serves the HTTP API until the process
//! receives a shutdown signal.

mod config;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chirp_api::{AppState, ServerConfig, start_server};
use chirp_core::{InMemoryFollowStore, InMemoryPostStore};
use chirp_db::{PgFollowStore, PgPostStore, PgUserStore, PostgresPool};
use chirp_identity::{InMemoryUserStore, TokenService};

use crate::config::{AppConfig, StorageBackend};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the database is
/// unreachable in postgres mode, or the server fails to bind.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("chirp-server starting");

    let config = AppConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        storage = config.storage.kind(),
        "configuration loaded"
    );

    let tokens = TokenService::new(&config.jwt_secret);
    let state = match &config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage; state will not survive restarts");
            AppState::new(
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryFollowStore::new()),
                Arc::new(InMemoryPostStore::new()),
                tokens,
            )
        }
        StorageBackend::Postgres { url } => {
            let pool = PostgresPool::connect_url(url).await?;
            pool.run_migrations().await?;
            AppState::new(
                Arc::new(PgUserStore::new(pool.pool().clone())),
                Arc::new(PgFollowStore::new(pool.pool().clone())),
                Arc::new(PgPostStore::new(pool.pool().clone())),
                tokens,
            )
        }
    };

    let server = ServerConfig {
        host: config.host,
        port: config.port,
    };
    start_server(&server, state).await?;

    Ok(())
}
