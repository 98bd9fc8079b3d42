//! Integration tests for the HTTP API.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, over fully in-memory stores. This validates
//! routing, extraction, the error-to-status mapping, and the end-to-end
//! behavior of the core services behind the handlers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use chirp_api::{AppState, build_router};

fn test_router() -> Router {
    build_router(AppState::in_memory("api-test-secret"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and return its id.
async fn signup(router: &Router, name: &str, email: &str) -> i64 {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            None,
            &json!({"name": name, "email": email, "password": "pw123", "profile": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["user_id"].as_i64().unwrap()
}

/// Log a user in and return a bearer token.
async fn login(router: &Router, email: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &json!({"email": email, "password": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_owned()
}

/// Register three users and return their tokens.
async fn three_users(router: &Router) -> [String; 3] {
    let mut tokens = Vec::new();
    for (name, email) in [
        ("user1", "user1@test.com"),
        ("user2", "user2@test.com"),
        ("user3", "user3@test.com"),
    ] {
        signup(router, name, email).await;
        tokens.push(login(router, email).await);
    }
    tokens.try_into().unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let response = test_router()
        .oneshot(bare_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_assigns_sequential_ids_and_rejects_duplicates() {
    let router = test_router();

    let first = signup(&router, "mina", "mina@test.com").await;
    assert_eq!(first, 1);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            None,
            &json!({"name": "other", "email": "mina@test.com", "password": "pw456"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_with_missing_fields_is_a_bad_request() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            None,
            &json!({"name": "mina"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let router = test_router();
    signup(&router, "mina", "mina@test.com").await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &json!({"email": "mina@test.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutations_without_a_token_are_unauthorized() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            None,
            &json!({"content": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/timeline", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let response = test_router()
        .oneshot(bare_request("GET", "/api/timeline", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_lifecycle_with_ownership() {
    let router = test_router();
    let [token1, token2, _] = three_users(&router).await;

    // Create.
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            Some(&token1),
            &json!({"content": "first post"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let post_id = created["post_id"].as_i64().unwrap();
    assert_eq!(created["post"]["author"].as_i64().unwrap(), 1);

    // A non-owner cannot edit it.
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/posts/{post_id}"),
            Some(&token2),
            &json!({"content": "hijacked"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can.
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/posts/{post_id}"),
            Some(&token1),
            &json!({"content": "edited"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["post"]["content"].as_str().unwrap(),
        "edited"
    );

    // A non-owner cannot delete it either.
    let response = router
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/posts/{post_id}"),
            Some(&token2),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner deletes; a second delete is 404.
    let response = router
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/posts/{post_id}"),
            Some(&token1),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/posts/{post_id}"),
            Some(&token1),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_content_is_a_bad_request() {
    let router = test_router();
    let [token1, _, _] = three_users(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            Some(&token1),
            &json!({"content": "a".repeat(301)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            Some(&token1),
            &json!({"content": "a".repeat(300)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn follow_mutations_map_error_kinds_to_statuses() {
    let router = test_router();
    let [token1, _, _] = three_users(&router).await;

    // Follow user 2.
    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/users/2/follow", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Again: conflict.
    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/users/2/follow", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Yourself: bad request.
    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/users/1/follow", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Someone who does not exist: not found.
    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/users/99/follow", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unfollow without an edge: not found.
    let response = router
        .clone()
        .oneshot(bare_request("DELETE", "/api/users/3/follow", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn follower_listings_carry_account_records() {
    let router = test_router();
    let [token1, token2, _] = three_users(&router).await;

    for token in [&token1, &token2] {
        let response = router
            .clone()
            .oneshot(bare_request("POST", "/api/users/3/follow", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users/3/followers", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["count"].as_u64().unwrap(), 2);
    let names: Vec<&str> = listing["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"user1") && names.contains(&"user2"));

    // Listings for unknown users are 404, not empty lists.
    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users/99/followers", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn follow_status_reflects_the_edge() {
    let router = test_router();
    let [token1, _, _] = three_users(&router).await;

    let response = router
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/users/2/follow-status",
            Some(&token1),
        ))
        .await
        .unwrap();
    assert!(!body_json(response).await["is_following"].as_bool().unwrap());

    router
        .clone()
        .oneshot(bare_request("POST", "/api/users/2/follow", Some(&token1)))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/users/2/follow-status",
            Some(&token1),
        ))
        .await
        .unwrap();
    assert!(body_json(response).await["is_following"].as_bool().unwrap());
}

#[tokio::test]
async fn timeline_follows_the_graph() {
    let router = test_router();
    let [token1, token2, token3] = three_users(&router).await;

    // An empty timeline is a normal response, not an error.
    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/timeline", Some(&token1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"].as_u64().unwrap(), 0);

    // User 1 follows users 2 and 3.
    for target in [2, 3] {
        router
            .clone()
            .oneshot(bare_request(
                "POST",
                &format!("/api/users/{target}/follow"),
                Some(&token1),
            ))
            .await
            .unwrap();
    }

    // User 2 posts "A", then user 3 posts "B".
    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            Some(&token2),
            &json!({"content": "A"}),
        ))
        .await
        .unwrap();
    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/posts",
            Some(&token3),
            &json!({"content": "B"}),
        ))
        .await
        .unwrap();

    // Newest first: B then A, with author names joined on.
    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/timeline", Some(&token1)))
        .await
        .unwrap();
    let feed = body_json(response).await;
    assert_eq!(feed["count"].as_u64().unwrap(), 2);
    let contents: Vec<&str> = feed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["B", "A"]);
    assert_eq!(
        feed["posts"][0]["author_name"].as_str().unwrap(),
        "user3"
    );

    // Unfollow user 3: only A remains.
    router
        .clone()
        .oneshot(bare_request("DELETE", "/api/users/3/follow", Some(&token1)))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/timeline", Some(&token1)))
        .await
        .unwrap();
    let feed = body_json(response).await;
    let contents: Vec<&str> = feed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["A"]);
}

#[tokio::test]
async fn user_posts_listing_is_newest_first() {
    let router = test_router();
    let [token1, _, _] = three_users(&router).await;

    for content in ["older", "newer"] {
        router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/posts",
                Some(&token1),
                &json!({"content": content}),
            ))
            .await
            .unwrap();
    }

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users/1/posts", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["count"].as_u64().unwrap(), 2);
    let contents: Vec<&str> = listing["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["newer", "older"]);
}

#[tokio::test]
async fn public_user_record_has_no_credentials() {
    let router = test_router();
    signup(&router, "mina", "mina@test.com").await;

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users/1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["name"].as_str().unwrap(), "mina");
    assert!(record.get("password_hash").is_none());

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users/42", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
