use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::models::{AuthConfig, Config, MediaConfig, ServerConfig, TmdbConfig};
use crate::sources::EnvConfig;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
const DEFAULT_TMDB_LANGUAGE: &str = "en-US";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("required environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Non-fatal findings surfaced during composition.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<String>,
}

impl ConfigWarnings {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.items.push(message.into());
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Loads `.env` (when present), gathers the environment, and composes a
/// validated [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    env_file: Option<PathBuf>,
    skip_env_file: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Skip `.env` loading entirely; used by tests that control the
    /// environment directly.
    pub fn without_env_file(mut self) -> Self {
        self.skip_env_file = true;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        if !self.skip_env_file {
            match &self.env_file {
                Some(path) => {
                    dotenvy::from_path(path).or_else(|err| match err {
                        // A missing explicit file is tolerated like a missing .env
                        dotenvy::Error::Io(_) => Ok(()),
                        other => Err(other),
                    })?;
                }
                None => {
                    dotenvy::dotenv().map(|_| ()).or_else(|err| match err {
                        dotenvy::Error::Io(_) => Ok(()),
                        other => Err(other),
                    })?;
                }
            }
        }

        Self::compose(EnvConfig::gather())
    }

    /// Compose a config from an already-gathered environment snapshot.
    pub fn compose(env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        let database_url = env
            .database_url
            .ok_or(ConfigLoadError::MissingVariable("DATABASE_URL"))?;
        if !(database_url.starts_with("postgres://")
            || database_url.starts_with("postgresql://"))
        {
            return Err(ConfigLoadError::InvalidValue {
                name: "DATABASE_URL",
                reason: "must start with postgres:// or postgresql://".to_string(),
            });
        }

        let jwt_secret = env
            .jwt_secret
            .ok_or(ConfigLoadError::MissingVariable("JWT_SECRET"))?;
        if jwt_secret.len() < 16 {
            warnings.push("JWT_SECRET is shorter than 16 bytes");
        }

        let api_key = env
            .tmdb_api_key
            .ok_or(ConfigLoadError::MissingVariable("TMDB_API_KEY"))?;

        let media_root = env
            .media_root
            .ok_or(ConfigLoadError::MissingVariable("MEDIA_ROOT"))?;
        if !media_root.is_dir() {
            warnings.push(format!(
                "MEDIA_ROOT {} does not exist yet; sync will fail until it does",
                media_root.display()
            ));
        }

        let base_url = env
            .tmdb_base_url
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|err| ConfigLoadError::InvalidValue {
            name: "TMDB_BASE_URL",
            reason: err.to_string(),
        })?;

        let defaults = ServerConfig::default();
        let config = Config {
            server: ServerConfig {
                host: env.server_host.unwrap_or(defaults.host),
                port: env.server_port.unwrap_or(defaults.port),
            },
            database_url,
            tmdb: TmdbConfig {
                api_key,
                base_url,
                image_base_url: env
                    .tmdb_image_base_url
                    .unwrap_or_else(|| DEFAULT_TMDB_IMAGE_BASE_URL.to_string()),
                language: env
                    .tmdb_language
                    .unwrap_or_else(|| DEFAULT_TMDB_LANGUAGE.to_string()),
            },
            media: MediaConfig { root: media_root },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs: env
                    .jwt_ttl_secs
                    .unwrap_or(AuthConfig::DEFAULT_TOKEN_TTL_SECS),
            },
        };

        Ok(ConfigLoad { config, warnings })
    }
}
