mod tmdb;

pub use tmdb::{MovieDetails, MovieSearchHit, TmdbProvider};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Remote movie metadata source.
///
/// The catalog reconciler only depends on this trait, so enrichment can be
/// exercised in tests without talking to the real API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full-text title search, in the provider's relevance order.
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>, ProviderError>;

    /// Extended record for a single movie, including credits and videos.
    async fn movie_details(&self, tmdb_id: i64) -> Result<MovieDetails, ProviderError>;
}
