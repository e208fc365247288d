//! Repository trait definitions.

use async_trait::async_trait;
use muchtodo_core::{MuchTodoResult, Todo, TodoId, User, UserId};

/// User collection.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> MuchTodoResult<Option<User>>;

    /// Finds a user by exact username match.
    async fn find_by_username(&self, username: &str) -> MuchTodoResult<Option<User>>;

    /// Returns every username, projecting only that column.
    async fn list_usernames(&self) -> MuchTodoResult<Vec<String>>;

    /// Inserts a new user. A duplicate username yields `Conflict`.
    async fn save(&self, user: &User) -> MuchTodoResult<User>;

    /// Updates an existing user. A duplicate username yields `Conflict`.
    async fn update(&self, user: &User) -> MuchTodoResult<User>;

    /// Deletes a user by ID.
    async fn delete(&self, id: UserId) -> MuchTodoResult<bool>;

    /// Checks that the collection is reachable.
    async fn health_check(&self) -> MuchTodoResult<()>;
}

/// Todo collection.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Inserts a new todo.
    async fn save(&self, todo: &Todo) -> MuchTodoResult<Todo>;

    /// Finds a todo by ID regardless of owner.
    async fn find_by_id(&self, id: TodoId) -> MuchTodoResult<Option<Todo>>;

    /// Lists a user's todos, newest first.
    async fn find_by_user(&self, user_id: UserId) -> MuchTodoResult<Vec<Todo>>;

    /// Updates an existing todo.
    async fn update(&self, todo: &Todo) -> MuchTodoResult<Todo>;

    /// Deletes a todo by ID.
    async fn delete(&self, id: TodoId) -> MuchTodoResult<bool>;

    /// Deletes every todo owned by a user. Returns the number removed.
    async fn delete_by_user(&self, user_id: UserId) -> MuchTodoResult<u64>;
}
