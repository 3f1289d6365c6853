use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// `GET /health` — lightweight liveness probe, no database touch.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/v1/health` — liveness plus database connectivity.
async fn api_health(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(DetailedHealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// Root-level health route.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// API-versioned health route.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(api_health))
}
