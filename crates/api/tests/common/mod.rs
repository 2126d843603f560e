#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use daydream_core::clip_ranking::CollisionPolicy;
use daydream_db::models::clip::CreateClip;
use daydream_db::models::user::UpsertUser;
use daydream_db::repositories::{ClipRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use daydream_api::auth::jwt::{issue_token, JwtConfig};
use daydream_api::config::ServerConfig;
use daydream_api::router::build_app_router;
use daydream_api::state::AppState;

pub const ADMIN_EMAIL: &str = "ops@livepeer.org";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        admin_domain: "livepeer.org".to_string(),
        collision_policy: CollisionPolicy::Demote,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
        },
    }
}

/// Build the full application router over `pool` with the test config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token_for(user_id: &str, email: Option<&str>) -> String {
    issue_token(user_id, email, 15, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token_for("did:privy:admin", Some(ADMIN_EMAIL))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, id: &str) {
    UserRepo::upsert(
        pool,
        &UpsertUser {
            id: id.to_string(),
            name: Some(format!("{id} name")),
            email: None,
        },
    )
    .await
    .unwrap();
}

/// A completed, approved clip with a thumbnail.
pub fn feed_clip(author: &str, prompt: &str) -> CreateClip {
    CreateClip {
        video_url: format!("https://cdn.example/{prompt}.mp4"),
        video_title: Some(prompt.to_string()),
        thumbnail_url: Some(format!("https://cdn.example/{prompt}.jpg")),
        author_user_id: author.to_string(),
        source_clip_id: None,
        prompt: prompt.to_string(),
        priority: None,
        status: Some("completed".to_string()),
        is_tutorial: None,
        approval_status: Some("approved".to_string()),
    }
}

/// Insert a clip with a slug derived from its prompt.
pub async fn insert_clip(pool: &PgPool, input: &CreateClip) -> i64 {
    let slug: String = format!("{:0<10}", input.prompt).chars().take(10).collect();
    ClipRepo::create_with_slug(pool, input, &slug)
        .await
        .unwrap()
        .id
}

/// Ids in the order a JSON array lists them.
pub fn ids_of(items: &serde_json::Value) -> Vec<i64> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}
