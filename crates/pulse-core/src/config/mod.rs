//! Deployment configuration.
//!
//! One [`AppConfig`] tree, one sub-module per section, loaded through the
//! `config` crate. Every field has a serde default, so a bare checkout
//! starts without any config file on disk; TOML overlays and `PULSE__*`
//! environment variables override per deployment.

pub mod auth;
pub mod logging;
pub mod push;
pub mod realtime;
pub mod server;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::push::PushConfig;
pub use self::realtime::RealtimeConfig;
pub use self::server::{CorsConfig, ServerConfig};

use crate::error::AppError;

/// Root of the configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener and CORS settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential gate settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Connection, presence, and typing settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Push fallback settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Builds the configuration for `env` (such as `development`).
    ///
    /// Sources, later ones winning: `config/default.toml`, then
    /// `config/{env}.toml`, then environment variables spelled
    /// `PULSE__SECTION__FIELD`. Missing files are fine; unparseable ones
    /// are not.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let raw = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(raw.try_deserialize()?)
    }
}
