//! MySQL user repository implementation.

use super::parse_uuid;
use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use muchtodo_core::{MuchTodoError, MuchTodoResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL user repository implementation.
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = MuchTodoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(parse_uuid(&row.id)?),
            username: row.username,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> MuchTodoResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner().to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> MuchTodoResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn list_usernames(&self) -> MuchTodoResult<Vec<String>> {
        let usernames: Vec<String> = sqlx::query_scalar("SELECT username FROM users")
            .fetch_all(self.pool.inner())
            .await?;

        debug!("Scanned {} usernames", usernames.len());
        Ok(usernames)
    }

    async fn save(&self, user: &User) -> MuchTodoResult<User> {
        debug!("Saving new user: {}", user.username);

        // MySQL doesn't support RETURNING, so insert then select
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, first_name, last_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.into_inner().to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.inner())
        .await
        .map_err(|e| duplicate_username(e, &user.username))?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| MuchTodoError::Internal("Failed to fetch inserted user".to_string()))
    }

    async fn update(&self, user: &User) -> MuchTodoResult<User> {
        debug!("Updating user: {}", user.id);

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, password_hash = ?, first_name = ?, last_name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.updated_at)
        .bind(user.id.into_inner().to_string())
        .execute(self.pool.inner())
        .await
        .map_err(|e| duplicate_username(e, &user.username))?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| MuchTodoError::not_found("User", user.id))
    }

    async fn delete(&self, id: UserId) -> MuchTodoResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.into_inner().to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> MuchTodoResult<()> {
        self.pool.health_check().await
    }
}

fn duplicate_username(err: sqlx::Error, username: &str) -> MuchTodoError {
    match MuchTodoError::from(err) {
        MuchTodoError::Conflict(_) => MuchTodoError::conflict(format!("Username '{}' is already taken", username)),
        other => other,
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
