//! # MuchToDo Repository
//!
//! Source-of-truth collections for users and todos.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository> / Arc<dyn TodoRepository>
//! MySqlUserRepository, MySqlTodoRepository   (SQLx)
//! InMemoryUserRepository, InMemoryTodoRepository
//! ```
//!
//! Username uniqueness is enforced here (unique index / insert check);
//! any cache in front of this layer is an optimization only.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
