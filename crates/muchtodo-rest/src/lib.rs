//! # MuchToDo REST
//!
//! HTTP surface: public `/auth` endpoints, `/users/me` and `/todos` behind
//! the bearer-token gate, and operational endpoints.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
