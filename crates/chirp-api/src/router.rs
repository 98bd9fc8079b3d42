//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS, request
//! tracing, and a per-request id. Every request gets a v4 UUID recorded
//! on its log span and a completion line with method, path, status, and
//! latency.

use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;

use crate::state::AppState;
use crate::{accounts, follows, posts};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness probe
/// - `POST /api/signup`, `POST /api/login` -- account endpoints
/// - `GET /api/users/{user_id}` -- public account record
/// - `POST|DELETE /api/users/{user_id}/follow` -- follow mutations
/// - `GET /api/users/{user_id}/followers|following|follow-status`
/// - `POST /api/posts`, `PUT|DELETE /api/posts/{post_id}`
/// - `GET /api/users/{user_id}/posts`, `GET /api/timeline`
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Liveness
        .route("/health", get(health))
        // Accounts
        .route("/api/signup", post(accounts::signup))
        .route("/api/login", post(accounts::login))
        .route("/api/users/{user_id}", get(accounts::get_user))
        // Follow graph
        .route(
            "/api/users/{user_id}/follow",
            post(follows::follow).delete(follows::unfollow),
        )
        .route("/api/users/{user_id}/followers", get(follows::followers))
        .route("/api/users/{user_id}/following", get(follows::following))
        .route(
            "/api/users/{user_id}/follow-status",
            get(follows::follow_status),
        )
        // Posts and timeline
        .route("/api/posts", post(posts::create_post))
        .route(
            "/api/posts/{post_id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route("/api/users/{user_id}/posts", get(posts::user_posts))
        .route("/api/timeline", get(posts::timeline))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

/// Handle `GET /health`.
async fn health() -> &'static str {
    "OK"
}

/// Attach a request id span and log completion with status and latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = tracing::info_span!("request", %request_id);
    let start = Instant::now();
    let response = next.run(request).instrument(span).await;

    tracing::info!(
        %request_id,
        %method,
        path,
        status = response.status().as_u16(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );
    response
}
