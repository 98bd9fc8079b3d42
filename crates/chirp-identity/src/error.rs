//! Error kinds for identity operations.

/// Errors produced by signup, login, and token validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The email address is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Login failed. Deliberately does not say whether the email or the
    /// password was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The requested account does not exist.
    #[error("user not found")]
    NotFound,

    /// The presented token is missing, malformed, or expired.
    #[error("invalid or expired token")]
    Token,

    /// A backend failure unrelated to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}
