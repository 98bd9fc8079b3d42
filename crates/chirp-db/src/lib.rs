//! `PostgreSQL` data layer for the chirp backend.
//!
//! Realizes the store contracts from `chirp-core` and `chirp-identity`
//! over [`sqlx`] with runtime query construction (not compile-time
//! checked) so no live database is needed at build time. All queries are
//! parameterized.
//!
//! Every operation is a single statement, so per-call atomicity comes
//! from the database itself: the `follows` primary key is the duplicate
//! gate, `rows_affected` distinguishes found from not-found, and the
//! unique email index backs account creation.
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, migrations
//! - [`follow_store`] -- [`chirp_core::store::FollowStore`] realization
//! - [`post_store`] -- [`chirp_core::store::PostStore`] realization
//! - [`user_store`] -- [`chirp_identity::store::UserStore`] realization
//! - [`error`] -- Pool and migration error types

pub mod error;
pub mod follow_store;
pub mod post_store;
pub mod postgres;
pub mod user_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use follow_store::PgFollowStore;
pub use post_store::PgPostStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use user_store::PgUserStore;
