//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a serde default, so a missing file yields a
//! usable development configuration (minus signing keys).

pub mod auth;
pub mod cache;
pub mod logging;
pub mod portal;
pub mod records;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::portal::{LoginFormConfig, PortalConfig};
pub use self::records::RecordsConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream portal endpoints.
    #[serde(default)]
    pub portal: PortalConfig,
    /// Bearer token signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Fetch pool settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Records retrieval settings.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `MALUUM`
    /// (e.g. `MALUUM__PORTAL__REQUEST_TIMEOUT_SECONDS=20`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MALUUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
