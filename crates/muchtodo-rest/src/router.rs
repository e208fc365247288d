//! Main application router.

use crate::{
    controllers::{auth_controller, health_controller, todo_controller, user_controller},
    middleware::{logging_middleware, require_auth, AuthMiddlewareState},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use muchtodo_config::ServerConfig;
use serde_json::json;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;

/// Creates the application router.
///
/// `/users` and `/todos` are wrapped in the auth gate; everything else is
/// public.
pub fn create_router(state: AppState, auth_state: AuthMiddlewareState, server_config: &ServerConfig) -> Router {
    let protected = Router::new()
        .nest("/users", user_controller::router())
        .nest("/todos", todo_controller::router())
        // route_layer: unknown paths fall through to the 404 handler
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/auth", auth_controller::router())
        .merge(protected)
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and OpenAPI document at /api-docs/openapi.json");
    router
}

fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}
