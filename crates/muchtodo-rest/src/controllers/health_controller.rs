//! Operational endpoints.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, `degraded` (cache down) or `unhealthy` (database down).
    pub status: String,
    pub version: String,
    pub database: String,
    /// `up`, `down` or `disabled`.
    pub cache: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

/// Creates the operational router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

async fn root() -> &'static str {
    "Welcome to the MuchToDo API"
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses((status = 200, description = "Alive", body = PingResponse))
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

/// Dependency health. 503 when the database is unreachable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = state.user_repository.health_check().await.is_ok();

    let cache = if !state.cache.is_enabled() {
        "disabled"
    } else if state.cache.ping().await.is_ok() {
        "up"
    } else {
        "down"
    };

    let (status_code, status) = match (database_up, cache) {
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
        (true, "down") => (StatusCode::OK, "degraded"),
        (true, _) => (StatusCode::OK, "healthy"),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: if database_up { "up" } else { "down" }.to_string(),
            cache: cache.to_string(),
        }),
    )
}
