//! Result type aliases for MuchToDo.

use crate::MuchTodoError;

/// A specialized `Result` type for MuchToDo operations.
pub type MuchTodoResult<T> = Result<T, MuchTodoError>;
