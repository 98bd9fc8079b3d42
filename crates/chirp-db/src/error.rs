//! Error types for the data layer.
//!
//! [`DbError`] covers pool construction and migrations. Inside the store
//! trait implementations, backend failures are mapped to the contract's
//! `Internal` kind instead, because the services match on kinds and a
//! transient database failure is not a caller error.

/// Errors that can occur while setting up the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
