//! # MuchToDo Server
//!
//! Dependency wiring and process lifecycle for the MuchToDo API.

pub mod app;
pub mod di;
pub mod startup;

pub use app::Application;
pub use di::{AppModule, AppModuleBuilder};
