use std::path::PathBuf;

use serde::Serialize;

/// Fully composed configuration, built once at process start.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database_url: String,
    pub tmdb: TmdbConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// External metadata provider settings.
#[derive(Debug, Clone, Serialize)]
pub struct TmdbConfig {
    /// Never logged; serialization is for config dumps in tests only.
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    /// Language passed to search/detail calls, e.g. "en-US".
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaConfig {
    /// Directory scanned for media files during catalog synchronization.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
}
