//! Authentication controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use muchtodo_service::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UsernameAvailabilityResponse,
};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/username-check/:username", get(check_username))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    debug!("Registration request for: {}", request.username);

    let response = state.auth_service.register(request).await?;
    Ok(created(response))
}

/// Login with username and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    debug!("Login request for: {}", request.username);

    let response = state.auth_service.login(request).await?;
    ok(response)
}

/// Logout. The client discards its token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(State(state): State<AppState>) -> ApiResult<MessageResponse> {
    let response = state.auth_service.logout().await?;
    ok(response)
}

/// Check whether a username is free.
#[utoipa::path(
    get,
    path = "/auth/username-check/{username}",
    tag = "auth",
    params(("username" = String, Path, description = "Username to check")),
    responses((status = 200, description = "Availability", body = UsernameAvailabilityResponse))
)]
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<UsernameAvailabilityResponse> {
    let response = state.auth_service.check_username(&username).await?;
    ok(response)
}
