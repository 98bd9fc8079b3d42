//! Follow graph handlers.
//!
//! The follower side of every mutation is the authenticated user; the
//! target comes from the path.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/users/{user_id}/follow` | Follow the target user |
//! | `DELETE` | `/api/users/{user_id}/follow` | Unfollow the target user |
//! | `GET` | `/api/users/{user_id}/followers` | Who follows the target |
//! | `GET` | `/api/users/{user_id}/following` | Who the target follows |
//! | `GET` | `/api/users/{user_id}/follow-status` | Does the caller follow the target |

use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use chirp_core::CoreError;
use chirp_types::{UserId, UserRecord};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Response body for follow/unfollow mutations.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The acting user.
    pub follower_id: UserId,
    /// The target user.
    pub following_id: UserId,
    /// Edge creation time; present on follow, absent on unfollow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response body for follower/following listings.
#[derive(Debug, Serialize)]
pub struct FollowListResponse {
    /// Account records, in no guaranteed order.
    pub users: Vec<UserRecord>,
    /// Number of records.
    pub count: usize,
}

/// Response body for `GET /api/users/{user_id}/follow-status`.
#[derive(Debug, Serialize)]
pub struct FollowStatusResponse {
    /// Whether the caller follows the target.
    pub is_following: bool,
    /// The caller.
    pub follower_id: UserId,
    /// The target.
    pub following_id: UserId,
}

/// Handle `POST /api/users/{user_id}/follow`.
pub async fn follow(
    State(state): State<AppState>,
    AuthUser(follower): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let following = UserId::new(user_id);
    let edge = state.graph.follow(follower, following).await?;

    Ok((
        StatusCode::CREATED,
        Json(FollowResponse {
            message: String::from("follow successful"),
            follower_id: follower,
            following_id: following,
            created_at: Some(edge.created_at),
        }),
    ))
}

/// Handle `DELETE /api/users/{user_id}/follow`.
pub async fn unfollow(
    State(state): State<AppState>,
    AuthUser(follower): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<FollowResponse>, ApiError> {
    let following = UserId::new(user_id);
    state.graph.unfollow(follower, following).await?;

    Ok(Json(FollowResponse {
        message: String::from("unfollow successful"),
        follower_id: follower,
        following_id: following,
        created_at: None,
    }))
}

/// Handle `GET /api/users/{user_id}/followers`.
pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<FollowListResponse>, ApiError> {
    let user = UserId::new(user_id);
    ensure_user_exists(&state, user).await?;

    let ids = state.graph.followers(user).await?;
    let users = resolve_records(&state, &ids).await?;
    Ok(Json(FollowListResponse {
        count: users.len(),
        users,
    }))
}

/// Handle `GET /api/users/{user_id}/following`.
pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<FollowListResponse>, ApiError> {
    let user = UserId::new(user_id);
    ensure_user_exists(&state, user).await?;

    let ids = state.graph.following(user).await?;
    let users = resolve_records(&state, &ids).await?;
    Ok(Json(FollowListResponse {
        count: users.len(),
        users,
    }))
}

/// Handle `GET /api/users/{user_id}/follow-status`.
pub async fn follow_status(
    State(state): State<AppState>,
    AuthUser(follower): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<FollowStatusResponse>, ApiError> {
    let following = UserId::new(user_id);
    let is_following = state.graph.is_following(follower, following).await?;

    Ok(Json(FollowStatusResponse {
        is_following,
        follower_id: follower,
        following_id: following,
    }))
}

/// Listing endpoints 404 for unknown users rather than returning an
/// empty list.
async fn ensure_user_exists(state: &AppState, user: UserId) -> Result<(), ApiError> {
    if state.directory.exists(user).await? {
        Ok(())
    } else {
        Err(ApiError::Core(CoreError::NotFound(String::from("user"))))
    }
}

/// Resolve a set of ids to account records, skipping any that vanished
/// between the graph read and the directory read.
async fn resolve_records(
    state: &AppState,
    ids: &HashSet<UserId>,
) -> Result<Vec<UserRecord>, ApiError> {
    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = state.directory.get(*id).await? {
            records.push(record);
        }
    }
    Ok(records)
}
