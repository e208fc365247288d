//! Todo CRUD scoped to the owning user.

use crate::dto::{CreateTodoRequest, TodoResponse, UpdateTodoRequest};
use async_trait::async_trait;
use muchtodo_core::{MuchTodoError, MuchTodoResult, Todo, TodoId, UserId, ValidateExt};
use muchtodo_repository::TodoRepository;
use std::sync::Arc;
use tracing::debug;

/// Todo service trait.
#[async_trait]
pub trait TodoService: Send + Sync {
    async fn create(&self, owner: UserId, request: CreateTodoRequest) -> MuchTodoResult<TodoResponse>;

    /// Lists the owner's todos, newest first.
    async fn list(&self, owner: UserId) -> MuchTodoResult<Vec<TodoResponse>>;

    async fn get(&self, owner: UserId, id: TodoId) -> MuchTodoResult<TodoResponse>;

    async fn update(&self, owner: UserId, id: TodoId, request: UpdateTodoRequest) -> MuchTodoResult<TodoResponse>;

    async fn delete(&self, owner: UserId, id: TodoId) -> MuchTodoResult<()>;
}

/// Todo service implementation.
pub struct TodoServiceImpl {
    todos: Arc<dyn TodoRepository>,
}

impl TodoServiceImpl {
    #[must_use]
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }

    // Another user's todo is reported exactly like a missing one.
    async fn load_owned(&self, owner: UserId, id: TodoId) -> MuchTodoResult<Todo> {
        match self.todos.find_by_id(id).await? {
            Some(todo) if todo.is_owned_by(owner) => Ok(todo),
            _ => Err(MuchTodoError::not_found("Todo", id)),
        }
    }
}

#[async_trait]
impl TodoService for TodoServiceImpl {
    async fn create(&self, owner: UserId, request: CreateTodoRequest) -> MuchTodoResult<TodoResponse> {
        request.validate_request()?;

        let todo = Todo::new(owner, request.title.trim().to_string(), request.description);
        let todo = self.todos.save(&todo).await?;

        debug!("Created todo {} for user {}", todo.id, owner);
        Ok(todo.into())
    }

    async fn list(&self, owner: UserId) -> MuchTodoResult<Vec<TodoResponse>> {
        let todos = self.todos.find_by_user(owner).await?;
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    async fn get(&self, owner: UserId, id: TodoId) -> MuchTodoResult<TodoResponse> {
        self.load_owned(owner, id).await.map(TodoResponse::from)
    }

    async fn update(&self, owner: UserId, id: TodoId, request: UpdateTodoRequest) -> MuchTodoResult<TodoResponse> {
        request.validate_request()?;

        let mut todo = self.load_owned(owner, id).await?;
        todo.apply(
            request.title.map(|t| t.trim().to_string()),
            request.description,
            request.completed,
        );

        let todo = self.todos.update(&todo).await?;
        debug!("Updated todo {}", todo.id);
        Ok(todo.into())
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> MuchTodoResult<()> {
        self.load_owned(owner, id).await?;
        if !self.todos.delete(id).await? {
            return Err(MuchTodoError::not_found("Todo", id));
        }
        debug!("Deleted todo {}", id);
        Ok(())
    }
}
