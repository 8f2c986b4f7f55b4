//! Environment-driven configuration for the Reelvault server.
//!
//! Configuration is read from the process environment exactly once at
//! startup (an optional `.env` file is loaded first) and composed into a
//! validated [`Config`] that the rest of the system borrows. Nothing else
//! in the workspace reads environment variables ad hoc.

mod loader;
mod models;
mod sources;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigWarnings};
pub use models::{AuthConfig, Config, MediaConfig, ServerConfig, TmdbConfig};
pub use sources::EnvConfig;
