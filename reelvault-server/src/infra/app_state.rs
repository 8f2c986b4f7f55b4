use std::fmt;
use std::sync::Arc;

use reelvault_config::Config;
use reelvault_core::{MetadataProvider, MovieRepository, UserRepository};

/// Shared handles threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        users: Arc<dyn UserRepository>,
        movies: Arc<dyn MovieRepository>,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            config,
            users,
            movies,
            provider,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("server", &self.config.server)
            .finish()
    }
}
