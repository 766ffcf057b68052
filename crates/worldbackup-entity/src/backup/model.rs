//! Backup entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worldbackup_core::types::BackupId;

/// One zip snapshot of a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Unique backup identifier.
    pub id: BackupId,
    /// When the archive was created.
    pub created_at: DateTime<Utc>,
    /// Base name of the archive file inside the backup directory.
    pub name: String,
}

impl Backup {
    /// Create a backup record.
    pub fn new(id: BackupId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            name: name.into(),
        }
    }
}
