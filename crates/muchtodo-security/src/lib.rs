//! # MuchToDo Security
//!
//! Stateless session tokens (HS256 JWT) and Argon2 password hashing.
//! Token validation is a pure function of the token, the signing key and
//! the injected [`Clock`].

pub mod clock;
pub mod jwt;
pub mod password;

pub use clock::*;
pub use jwt::*;
pub use password::*;
