//! Persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the folder/world/backup records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON data file.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

fn default_data_file() -> String {
    "data.json".to_string()
}
