//! Shared data models for the Reelvault media catalog.
//!
//! This crate holds the plain domain types exchanged between the core
//! library and the HTTP server: catalog entries, their TMDB metadata
//! block, and user accounts with their role hierarchy. No I/O lives here.

mod movie;
mod user;

pub use movie::{EnrichmentStatus, MovieRecord, MovieSummary, TmdbMetadata};
pub use user::{User, UserRole};
