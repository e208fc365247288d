//! In-process repository implementations.
//!
//! Used when `database.backend = "memory"` and by tests. Each collection is
//! a `parking_lot::RwLock<HashMap>`; locks are never held across an await.

mod todo_repository;
mod user_repository;

pub use todo_repository::InMemoryTodoRepository;
pub use user_repository::InMemoryUserRepository;
