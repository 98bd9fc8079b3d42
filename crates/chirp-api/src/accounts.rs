//! Signup, login, and user lookup handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/signup` | Register an account |
//! | `POST` | `/api/login` | Authenticate, mint a bearer token |
//! | `GET` | `/api/users/{user_id}` | Public account record |

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use chirp_core::CoreError;
use chirp_types::{UserId, UserRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unique email address.
    #[serde(default)]
    pub email: String,
    /// Plaintext password; hashed before it reaches any store.
    #[serde(default)]
    pub password: String,
    /// Optional profile text.
    #[serde(default)]
    pub profile: String,
}

/// Response body for a successful signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The new account's id.
    pub user_id: UserId,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Registered email address.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Bearer token for authenticated requests, valid 24 hours.
    pub access_token: String,
    /// The authenticated account's id.
    pub user_id: UserId,
}

/// Handle `POST /api/signup`.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .identity
        .signup(&body.name, &body.email, &body.password, &body.profile)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: String::from("signup successful"),
            user_id: user.id,
        }),
    ))
}

/// Handle `POST /api/login`.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.identity.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        message: String::from("login successful"),
        access_token: outcome.access_token,
        user_id: outcome.user.id,
    }))
}

/// Handle `GET /api/users/{user_id}`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserRecord>, ApiError> {
    let record = state
        .directory
        .get(UserId::new(user_id))
        .await?
        .ok_or_else(|| CoreError::NotFound(String::from("user")))?;

    Ok(Json(record))
}
