//! Core library for the Reelvault media catalog.
//!
//! Holds the persistence ports and their Postgres implementations, the
//! filename normalizer, the TMDB metadata provider, and the catalog
//! reconciler that ties them together.

pub mod database;
pub mod error;
pub mod metadata;
pub mod providers;
pub mod sync;

pub use database::{
    MovieRepository, PostgresMovieRepository, PostgresUserRepository, UserRepository, connect,
    run_migrations,
};
pub use error::{CoreError, Result};
pub use metadata::{MEDIA_EXTENSIONS, clean_title, has_media_extension};
pub use providers::{MetadataProvider, MovieDetails, MovieSearchHit, ProviderError, TmdbProvider};
pub use sync::{CatalogReconciler, SyncReport};
