//! Shared type definitions for the chirp social backend.
//!
//! This crate is the single source of truth for the entity types used
//! across the chirp workspace: typed identifiers, account records, follow
//! edges, and posts. Every other crate depends on it; it depends on
//! nothing but `serde` and `chrono`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for entity identifiers
//! - [`entities`] -- Core entity structs (users, follow edges, posts)

pub mod entities;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use entities::{FollowEdge, Post, User, UserRecord};
pub use ids::{PostId, UserId};
