//! API error type and its HTTP response mapping.
//!
//! [`ApiError`] wraps the core and identity error kinds and converts
//! each into a status code and JSON body. The mapping is by kind, never
//! by message text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chirp_core::CoreError;
use chirp_identity::IdentityError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An identity operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The request carried no `Authorization` header.
    #[error("authorization header required")]
    MissingToken,

    /// The `Authorization` header is not a Bearer token.
    #[error("invalid authorization header format")]
    MalformedAuthHeader,
}

/// Status code for each core error kind.
const fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) | CoreError::SelfFollow => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Unauthorized(_) => StatusCode::FORBIDDEN,
        CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Status code for each identity error kind.
const fn identity_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::Validation(_) => StatusCode::BAD_REQUEST,
        IdentityError::EmailTaken => StatusCode::CONFLICT,
        IdentityError::InvalidCredentials | IdentityError::Token => StatusCode::UNAUTHORIZED,
        IdentityError::NotFound => StatusCode::NOT_FOUND,
        IdentityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Core(err) => core_status(err),
            Self::Identity(err) => identity_status(err),
            Self::MissingToken | Self::MalformedAuthHeader => StatusCode::UNAUTHORIZED,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
