//! Bearer-token extraction for authenticated routes.
//!
//! Handlers that need an acting user take an [`AuthUser`] argument; the
//! extractor validates the token against the identity service and yields
//! the authenticated id. A missing or malformed header, or a token that
//! fails validation, rejects with 401 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use chirp_types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user on this request.
///
/// This id -- never anything in the request body -- is the acting id for
/// every mutation.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MalformedAuthHeader)?;

        let claims = state.identity.authenticate(token)?;
        Ok(Self(claims.user_id()))
    }
}
