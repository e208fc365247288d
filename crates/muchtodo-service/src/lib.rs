//! # MuchToDo Service
//!
//! Business logic and the cache tier.
//!
//! ```text
//! AuthService ──► UsernameAvailabilityService ──► CacheStore (hit = taken)
//!      │                      └────────────────► UserRepository (on miss)
//!      └──► TokenProvider, PasswordHasher
//! UsernameCacheWarmer: UserRepository::list_usernames ──► CacheStore::set_many
//! ```

pub mod auth_service;
pub mod availability;
pub mod cache;
pub mod dto;
pub mod todo_service;
pub mod user_service;

pub use auth_service::*;
pub use availability::*;
pub use cache::*;
pub use dto::*;
pub use todo_service::*;
pub use user_service::*;
