//! Reelvault HTTP API.
//!
//! Route groups live in [`routes`], shared state and error handling in
//! [`infra`], and the domain logic in the `reelvault-core` crate.

pub mod auth;
pub mod infra;
pub mod movies;
pub mod routes;
pub mod stream;
pub mod users;

pub use infra::{AppError, AppResult, AppState};
pub use routes::create_router;
