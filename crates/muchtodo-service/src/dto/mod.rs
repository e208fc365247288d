//! Data Transfer Objects (DTOs).

mod auth_dto;
mod todo_dto;
mod user_dto;

pub use auth_dto::*;
pub use todo_dto::*;
pub use user_dto::*;
