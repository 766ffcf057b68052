//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from a
//! TOML or JSON file overlaid with `WORLDBACKUP__*` environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod logging;
pub mod storage;
pub mod watcher;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;
pub use self::watcher::WatcherConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Watch/backup engine settings.
    pub watcher: WatcherConfig,
    /// Persistence settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a file and the environment.
    ///
    /// The file is optional; environment variables prefixed with
    /// `WORLDBACKUP__` override it (`WORLDBACKUP__SERVER__PORT=9000`).
    /// Environment references in watch and backup paths are expanded.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("WORLDBACKUP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        Ok(config.expand_paths())
    }

    /// Expand `$VAR` / `${VAR}` references in the watcher paths.
    pub fn expand_paths(mut self) -> Self {
        self.watcher.backup_dir = expand_env(&self.watcher.backup_dir);
        self.watcher.watch_dirs = self
            .watcher
            .watch_dirs
            .iter()
            .map(|d| expand_env(d))
            .collect();
        self
    }
}

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("valid env reference pattern")
});

/// Replace `$VAR` and `${VAR}` with the value of the environment variable.
///
/// Unset variables expand to the empty string. A `$` that does not start a
/// variable name is left untouched.
pub fn expand_env(input: &str) -> String {
    ENV_REF
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_default()
        })
        .into_owned()
}
