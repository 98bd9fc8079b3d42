//! Post and timeline handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/posts` | Create a post |
//! | `PUT` | `/api/posts/{post_id}` | Edit own post |
//! | `DELETE` | `/api/posts/{post_id}` | Delete own post |
//! | `GET` | `/api/users/{user_id}/posts` | One author's posts, newest first |
//! | `GET` | `/api/timeline` | The caller's timeline, newest first |

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chirp_types::{Post, PostId, UserId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/posts` and `PUT /api/posts/{post_id}`.
#[derive(Debug, Deserialize)]
pub struct PostContentRequest {
    /// Post text, 1..=300 characters.
    #[serde(default)]
    pub content: String,
}

/// Response body for post mutations that return the stored post.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The post's id.
    pub post_id: PostId,
    /// The stored post.
    pub post: Post,
}

/// Response body for `DELETE /api/posts/{post_id}`.
#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The deleted post's id.
    pub post_id: PostId,
}

/// Response body for `GET /api/users/{user_id}/posts`.
#[derive(Debug, Serialize)]
pub struct UserPostsResponse {
    /// The author's posts, newest first.
    pub posts: Vec<Post>,
    /// Number of posts.
    pub count: usize,
}

/// A timeline entry: a post plus its author's display name.
#[derive(Debug, Serialize)]
pub struct TimelinePost {
    /// The post's id.
    pub id: PostId,
    /// The author's id.
    pub author: UserId,
    /// The author's display name at read time.
    pub author_name: String,
    /// Post text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

/// Response body for `GET /api/timeline`.
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    /// The merged feed, newest first.
    pub posts: Vec<TimelinePost>,
    /// Number of posts.
    pub count: usize,
}

/// Handle `POST /api/posts`.
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    Json(body): Json<PostContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.create(author, &body.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: String::from("post created"),
            post_id: post.id,
            post,
        }),
    ))
}

/// Handle `PUT /api/posts/{post_id}`.
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(acting): AuthUser,
    Path(post_id): Path<i64>,
    Json(body): Json<PostContentRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .posts
        .update(PostId::new(post_id), acting, &body.content)
        .await?;

    Ok(Json(PostResponse {
        message: String::from("post updated"),
        post_id: post.id,
        post,
    }))
}

/// Handle `DELETE /api/posts/{post_id}`.
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(acting): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<DeletePostResponse>, ApiError> {
    let id = PostId::new(post_id);
    state.posts.delete(id, acting).await?;

    Ok(Json(DeletePostResponse {
        message: String::from("post deleted"),
        post_id: id,
    }))
}

/// Handle `GET /api/users/{user_id}/posts`.
pub async fn user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserPostsResponse>, ApiError> {
    let posts = state.posts.by_author(UserId::new(user_id)).await?;

    Ok(Json(UserPostsResponse {
        count: posts.len(),
        posts,
    }))
}

/// Handle `GET /api/timeline`.
pub async fn timeline(
    State(state): State<AppState>,
    AuthUser(viewer): AuthUser,
) -> Result<Json<TimelineResponse>, ApiError> {
    let feed = state.timeline.timeline(viewer).await?;
    let posts = enrich_with_author_names(&state, feed).await?;

    Ok(Json(TimelineResponse {
        count: posts.len(),
        posts,
    }))
}

/// Join author display names onto a feed, one directory read per
/// distinct author.
async fn enrich_with_author_names(
    state: &AppState,
    feed: Vec<Post>,
) -> Result<Vec<TimelinePost>, ApiError> {
    let mut names: HashMap<UserId, String> = HashMap::new();
    for post in &feed {
        if !names.contains_key(&post.author) {
            let name = state
                .directory
                .get(post.author)
                .await?
                .map_or_else(String::new, |record| record.name);
            names.insert(post.author, name);
        }
    }

    Ok(feed
        .into_iter()
        .map(|post| TimelinePost {
            author_name: names.get(&post.author).cloned().unwrap_or_default(),
            id: post.id,
            author: post.author,
            content: post.content,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect())
}
