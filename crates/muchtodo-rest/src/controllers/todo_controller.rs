//! Todo controller. Every route sits behind the auth gate.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use muchtodo_core::{MuchTodoError, TodoId};
use muchtodo_service::{CreateTodoRequest, TodoResponse, UpdateTodoRequest};

/// Creates the todo router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
}

fn parse_todo_id(id: &str) -> Result<TodoId, AppError> {
    TodoId::parse(id).map_err(|_| AppError(MuchTodoError::validation(format!("Invalid todo id: {}", id))))
}

/// Create a todo.
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    security(("bearer_auth" = [])),
    request_body = CreateTodoRequest,
    responses((status = 201, description = "Todo created", body = TodoResponse))
)]
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TodoResponse>>), AppError> {
    let response = state.todo_service.create(*user, request).await?;
    Ok(created(response))
}

/// List the caller's todos, newest first.
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Todos", body = [TodoResponse]))
)]
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Vec<TodoResponse>> {
    let response = state.todo_service.list(*user).await?;
    ok(response)
}

/// Get one of the caller's todos.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo", body = TodoResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<TodoResponse> {
    let id = parse_todo_id(&id)?;
    let response = state.todo_service.get(*user, id).await?;
    ok(response)
}

/// Partially update one of the caller's todos.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "todos",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = TodoResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTodoRequest>,
) -> ApiResult<TodoResponse> {
    let id = parse_todo_id(&id)?;
    let response = state.todo_service.update(*user, id, request).await?;
    ok(response)
}

/// Delete one of the caller's todos.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&id)?;
    state.todo_service.delete(*user, id).await?;
    Ok(no_content())
}
