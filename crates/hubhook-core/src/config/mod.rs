//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file
//! merged with `HUBHOOK__*` environment variables via the `config` crate.
//! Every field has a serde default, so a missing file yields a usable
//! configuration.

pub mod console;
pub mod dispatcher;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::console::ConsoleConfig;
use self::dispatcher::DispatcherConfig;
use self::logging::LoggingConfig;

use crate::result::AppResult;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dispatcher behavior.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Console host settings.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Environment variables use the `HUBHOOK` prefix and `__` as the section
    /// separator, e.g. `HUBHOOK__DISPATCHER__ADMIN_CLASS=5`.
    pub fn load(path: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HUBHOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
