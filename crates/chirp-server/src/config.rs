//! Environment-driven configuration for the server binary.
//!
//! All settings come from environment variables:
//!
//! - `HOST` -- bind address (default `0.0.0.0`)
//! - `PORT` -- listen port (default `8080`)
//! - `STORAGE` -- `memory` or `postgres` (default `memory`)
//! - `DATABASE_URL` -- required when `STORAGE=postgres`
//! - `JWT_SECRET` -- required; signs access tokens
//! - `RUST_LOG` -- tracing filter (default `info`)

use std::env;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `JWT_SECRET` must be set; tokens cannot be signed without it.
    #[error("JWT_SECRET environment variable is not set")]
    MissingJwtSecret,

    /// `PORT` was set but is not a valid port number.
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),

    /// `STORAGE` was set to something other than `memory` or `postgres`.
    #[error("unknown STORAGE backend: {0} (expected 'memory' or 'postgres')")]
    UnknownStorage(String),

    /// `STORAGE=postgres` without a `DATABASE_URL`.
    #[error("DATABASE_URL is required when STORAGE=postgres")]
    MissingDatabaseUrl,
}

/// Which store realization backs the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory stores; state is lost on restart.
    Memory,
    /// `PostgreSQL`-backed stores.
    Postgres {
        /// Connection URL.
        url: String,
    },
}

impl StorageBackend {
    /// Short name for logging. Never includes the connection URL, which
    /// may carry credentials.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Typed view of the server's environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Store realization to construct.
    pub storage: StorageBackend,
    /// Secret for signing access tokens.
    pub jwt_secret: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing `JWT_SECRET`, an unparsable
    /// `PORT`, an unknown `STORAGE` value, or a missing `DATABASE_URL`
    /// in postgres mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| String::from("0.0.0.0"));

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_parse_err| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        let storage = match env::var("STORAGE").as_deref() {
            Ok("memory") | Err(_) => StorageBackend::Memory,
            Ok("postgres") => {
                let url = env::var("DATABASE_URL")
                    .map_err(|_missing| ConfigError::MissingDatabaseUrl)?;
                StorageBackend::Postgres { url }
            }
            Ok(other) => return Err(ConfigError::UnknownStorage(other.to_owned())),
        };

        let jwt_secret = env::var("JWT_SECRET").map_err(|_missing| ConfigError::MissingJwtSecret)?;

        Ok(Self {
            host,
            port,
            storage,
            jwt_secret,
        })
    }
}
