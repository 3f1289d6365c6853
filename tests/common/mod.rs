#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use serde_json::json;
use tower::ServiceExt;

use clubdesk_api::cache::SportCache;
use clubdesk_api::config::{Config, Environment};
use clubdesk_api::state::AppState;

/// Credentials of the admin account the migrations seed.
pub const ADMIN_EMAIL: &str = "admin@clubdesk.local";
pub const ADMIN_PASSWORD: &str = "clubdesk-admin";

/// Build an app backed by a fresh in-memory database with migrations applied
/// and the sport cache warmed, exactly as the real startup does.
pub async fn test_app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let sports = SportCache::new();
    sports.warm(&db).await.unwrap_or_default();

    let state = AppState {
        db,
        config: Config {
            database_url: String::new(),
            server_host: std::net::IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_access_expiration_secs: 3600,
            frontend_url: "http://localhost:3001".to_string(),
        },
        sports,
    };

    clubdesk_api::routes::router().with_state(state)
}

/// Sign in and return the access token.
pub async fn signin(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/signin",
        &json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["token"].as_str().unwrap_or_default().to_string()
}

/// Sign in as the seeded admin.
pub async fn admin_token(app: &Router) -> String {
    signin(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Create a user with the given role (as admin) and return its id.
pub async fn create_user(
    app: &Router,
    admin: &str,
    email: &str,
    name: &str,
    role: &str,
    password: Option<&str>,
) -> String {
    let mut payload = json!({ "email": email, "name": name, "role": role });
    if let Some(pw) = password {
        payload["password"] = json!(pw);
    }
    let (status, body) = post_json_with_auth(app, "/api/v1/users", &payload, admin).await;
    assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["id"].as_str().unwrap_or_default().to_string()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();
    (status, body_str)
}

fn json_request(
    method: &str,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .unwrap_or_default()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap_or_default()
}

/// Test helper: send a GET request and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, empty_request("GET", uri, None)).await
}

/// Test helper: authenticated GET.
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, empty_request("GET", uri, Some(token))).await
}

/// Test helper: unauthenticated POST with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send(app, json_request("POST", uri, body, None)).await
}

/// Test helper: authenticated POST with a JSON body.
pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, json_request("POST", uri, body, Some(token))).await
}

/// Test helper: authenticated PATCH with a JSON body.
pub async fn patch_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, json_request("PATCH", uri, body, Some(token))).await
}

/// Test helper: authenticated PUT with a JSON body.
pub async fn put_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, json_request("PUT", uri, body, Some(token))).await
}

/// Test helper: authenticated DELETE.
pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, empty_request("DELETE", uri, Some(token))).await
}
