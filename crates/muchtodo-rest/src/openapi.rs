//! OpenAPI document.

use crate::controllers::health_controller::{HealthResponse, PingResponse};
use muchtodo_core::{ErrorResponse, FieldError, TodoId, UserId};
use muchtodo_service::{
    AuthResponse, ChangePasswordRequest, CreateTodoRequest, LoginRequest, MessageResponse,
    RegisterRequest, TodoResponse, UpdateTodoRequest, UpdateUserRequest, UserResponse,
    UsernameAvailabilityResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the MuchToDo API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MuchToDo API",
        version = "1.0.0",
        description = "Task lists with user accounts"
    ),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::logout,
        crate::controllers::auth_controller::check_username,
        crate::controllers::user_controller::get_current_user,
        crate::controllers::user_controller::update_current_user,
        crate::controllers::user_controller::change_password,
        crate::controllers::user_controller::delete_current_user,
        crate::controllers::todo_controller::create_todo,
        crate::controllers::todo_controller::list_todos,
        crate::controllers::todo_controller::get_todo,
        crate::controllers::todo_controller::update_todo,
        crate::controllers::todo_controller::delete_todo,
        crate::controllers::health_controller::ping,
        crate::controllers::health_controller::health_check,
    ),
    components(
        schemas(
            UserId,
            TodoId,
            ErrorResponse,
            FieldError,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UsernameAvailabilityResponse,
            MessageResponse,
            UserResponse,
            UpdateUserRequest,
            ChangePasswordRequest,
            CreateTodoRequest,
            UpdateTodoRequest,
            TodoResponse,
            HealthResponse,
            PingResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and username checks"),
        (name = "users", description = "The authenticated account"),
        (name = "todos", description = "The authenticated user's todos"),
        (name = "health", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

/// Bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
