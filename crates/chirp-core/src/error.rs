//! The closed error-kind enumeration for core operations.
//!
//! Callers match on the variant, never on message text. Every operation
//! returns the kind for the *first* violated precondition in its
//! documented check order, and nothing is swallowed or retried
//! internally -- [`CoreError::Internal`] in particular must reach the
//! caller so it can decide whether to retry.

/// Errors produced by the social-graph and post operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed, missing, or oversized input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The named user, edge, or post does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The follow edge already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A mutation was attempted by someone other than the owner.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A user tried to follow themselves.
    #[error("cannot follow yourself")]
    SelfFollow,

    /// A backend failure unrelated to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}
