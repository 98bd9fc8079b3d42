//! HTTP API for the chirp backend.
//!
//! A thin Axum layer over the core and identity services: routing,
//! request/response marshalling, bearer-token extraction, and mapping
//! error kinds to status codes. All business rules live below this
//! crate; handlers validate nothing themselves.
//!
//! On authenticated routes the acting user id always comes from the
//! validated token claims, never from the request body, so the ownership
//! checks downstream cannot be bypassed by a forged field.
//!
//! # Modules
//!
//! - [`router`] -- Route table and middleware stack
//! - [`state`] -- Shared application state (service handles)
//! - [`auth`] -- Bearer-token extractor
//! - [`accounts`] -- Signup, login, and user lookup handlers
//! - [`follows`] -- Follow graph handlers
//! - [`posts`] -- Post and timeline handlers
//! - [`server`] -- TCP bind and graceful shutdown
//! - [`error`] -- `ApiError` and its response mapping

pub mod accounts;
pub mod auth;
pub mod error;
pub mod follows;
pub mod posts;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
