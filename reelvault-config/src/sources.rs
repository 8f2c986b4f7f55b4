use std::path::PathBuf;

/// Raw environment snapshot, gathered in one place so the set of variables
/// the server reacts to is auditable at a glance.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub tmdb_image_base_url: Option<String>,
    pub tmdb_language: Option<String>,
    pub media_root: Option<PathBuf>,
    pub jwt_secret: Option<String>,
    pub jwt_ttl_secs: Option<i64>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            server_host: std::env::var("SERVER_HOST").ok(),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
            database_url: std::env::var("DATABASE_URL").ok(),
            tmdb_api_key: std::env::var("TMDB_API_KEY").ok(),
            tmdb_base_url: std::env::var("TMDB_BASE_URL").ok(),
            tmdb_image_base_url: std::env::var("TMDB_IMAGE_BASE_URL").ok(),
            tmdb_language: std::env::var("TMDB_LANG").ok(),
            media_root: std::env::var("MEDIA_ROOT").ok().map(PathBuf::from),
            jwt_secret: std::env::var("JWT_SECRET").ok(),
            jwt_ttl_secs: std::env::var("JWT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}
