//! Current-user controller. Every route sits behind the auth gate.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Router,
};
use muchtodo_service::{ChangePasswordRequest, MessageResponse, UpdateUserRequest, UserResponse};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user).put(update_current_user).delete(delete_current_user))
        .route("/me/password", put(change_password))
}

/// Get the authenticated user.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<UserResponse> {
    let response = state.user_service.get_current(*user).await?;
    ok(response)
}

/// Update profile fields and optionally the username.
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update request for user {}", *user);

    let response = state.user_service.update_current(*user, request).await?;
    ok(response)
}

/// Change password.
#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Current password incorrect")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<MessageResponse> {
    let response = state.user_service.change_password(*user, request).await?;
    ok(response)
}

/// Delete the account and its todos.
#[utoipa::path(
    delete,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses((status = 204, description = "Account deleted"))
)]
pub async fn delete_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    debug!("Delete request for user {}", *user);

    state.user_service.delete_current(*user).await?;
    Ok(no_content())
}
