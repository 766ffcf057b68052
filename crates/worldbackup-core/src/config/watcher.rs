//! Watch/backup engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::duration::parse_duration;

/// Configuration for the periodic world scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Directories whose immediate subdirectories are backed up as worlds.
    #[serde(default)]
    pub watch_dirs: Vec<String>,
    /// Directory receiving the zip archives.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    /// Scan interval as a duration string (`"30s"`, `"5m"`, `"1h30m"`).
    #[serde(default = "default_check_interval")]
    pub check_interval: String,
}

impl WatcherConfig {
    /// Parse [`Self::check_interval`].
    ///
    /// A zero interval is rejected since the scan loop would never sleep.
    pub fn check_interval(&self) -> Result<Duration, AppError> {
        let interval = parse_duration(&self.check_interval).map_err(|e| {
            AppError::configuration(format!(
                "Invalid check interval '{}': {e}",
                self.check_interval
            ))
        })?;

        if interval.is_zero() {
            return Err(AppError::configuration(format!(
                "Invalid check interval '{}': must be greater than zero",
                self.check_interval
            )));
        }

        Ok(interval)
    }

    /// The backup directory as a path.
    pub fn backup_path(&self) -> PathBuf {
        PathBuf::from(&self.backup_dir)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watch_dirs: Vec::new(),
            backup_dir: default_backup_dir(),
            check_interval: default_check_interval(),
        }
    }
}

fn default_backup_dir() -> String {
    "./backups".to_string()
}

fn default_check_interval() -> String {
    "5m".to_string()
}
