//! MySQL todo repository implementation.

use super::parse_uuid;
use crate::{traits::TodoRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use muchtodo_core::{MuchTodoError, MuchTodoResult, Todo, TodoId, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL todo repository implementation.
#[derive(Clone)]
pub struct MySqlTodoRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlTodoRepository {
    /// Creates a new MySQL todo repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TodoRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = MuchTodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TodoRepository for MySqlTodoRepository {
    async fn save(&self, todo: &Todo) -> MuchTodoResult<Todo> {
        debug!("Saving todo {} for user {}", todo.id, todo.user_id);

        sqlx::query(
            r#"
            INSERT INTO todos (id, user_id, title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(todo.id.into_inner().to_string())
        .bind(todo.user_id.into_inner().to_string())
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(todo.id)
            .await?
            .ok_or_else(|| MuchTodoError::Internal("Failed to fetch inserted todo".to_string()))
    }

    async fn find_by_id(&self, id: TodoId) -> MuchTodoResult<Option<Todo>> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner().to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> MuchTodoResult<Vec<Todo>> {
        debug!("Listing todos for user: {}", user_id);

        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.into_inner().to_string())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn update(&self, todo: &Todo) -> MuchTodoResult<Todo> {
        debug!("Updating todo: {}", todo.id);

        sqlx::query(
            r#"
            UPDATE todos
            SET title = ?, description = ?, completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .bind(todo.id.into_inner().to_string())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(todo.id)
            .await?
            .ok_or_else(|| MuchTodoError::not_found("Todo", todo.id))
    }

    async fn delete(&self, id: TodoId) -> MuchTodoResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.into_inner().to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: UserId) -> MuchTodoResult<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE user_id = ?")
            .bind(user_id.into_inner().to_string())
            .execute(self.pool.inner())
            .await?;

        debug!("Deleted {} todos for user {}", result.rows_affected(), user_id);
        Ok(result.rows_affected())
    }
}

impl std::fmt::Debug for MySqlTodoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTodoRepository").finish_non_exhaustive()
    }
}
