//! # MuchToDo Config
//!
//! Layered configuration for the MuchToDo service: TOML files, a `.env`
//! file, and `MUCHTODO__`-prefixed environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
