//! Application state for Axum handlers.

use muchtodo_repository::UserRepository;
use muchtodo_service::{AuthService, CacheStore, TodoService, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub todo_service: Arc<dyn TodoService>,
    /// Checked by `/health`.
    pub user_repository: Arc<dyn UserRepository>,
    /// Checked by `/health` when enabled.
    pub cache: Arc<dyn CacheStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        todo_service: Arc<dyn TodoService>,
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            todo_service,
            user_repository,
            cache,
        }
    }
}
