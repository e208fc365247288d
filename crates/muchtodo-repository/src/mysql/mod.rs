//! MySQL repository implementations.

mod todo_repository;
mod user_repository;

pub use todo_repository::MySqlTodoRepository;
pub use user_repository::MySqlUserRepository;

use muchtodo_core::MuchTodoError;
use uuid::Uuid;

// MySQL stores UUIDs as CHAR(36).
fn parse_uuid(raw: &str) -> Result<Uuid, MuchTodoError> {
    Uuid::parse_str(raw).map_err(|e| MuchTodoError::Internal(format!("Invalid UUID in database: {}", e)))
}
