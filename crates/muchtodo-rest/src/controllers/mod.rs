//! REST controllers.

pub mod auth_controller;
pub mod health_controller;
pub mod todo_controller;
pub mod user_controller;
