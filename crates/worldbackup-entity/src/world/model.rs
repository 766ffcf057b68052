//! World entity model.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worldbackup_core::types::{BackupId, WorldId};

use crate::backup::Backup;

/// A game world: one immediate subdirectory of a watched folder.
///
/// Backups are kept in creation order; the last entry is the newest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    /// Unique world identifier.
    pub id: WorldId,
    /// When the world was first seen.
    pub created_at: DateTime<Utc>,
    /// Directory base name, unique within the owning folder.
    pub name: String,
    /// Absolute path of the world directory.
    pub full_path: PathBuf,
    /// Backups, oldest first.
    #[serde(default)]
    pub backups: Vec<Backup>,
}

impl World {
    /// Create a world located at `folder_path/name` with no backups.
    pub fn new(
        id: WorldId,
        folder_path: &Path,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            created_at,
            full_path: folder_path.join(&name),
            name,
            backups: Vec::new(),
        }
    }

    /// Append a backup record and return it.
    pub fn add_backup(
        &mut self,
        id: BackupId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> &Backup {
        let index = self.backups.len();
        self.backups.push(Backup::new(id, name, created_at));
        &self.backups[index]
    }

    /// Find a backup by id.
    pub fn backup(&self, id: BackupId) -> Option<&Backup> {
        self.backups.iter().find(|b| b.id == id)
    }

    /// Remove a backup record, preserving the order of the others.
    pub fn remove_backup(&mut self, id: BackupId) -> Option<Backup> {
        let index = self.backups.iter().position(|b| b.id == id)?;
        Some(self.backups.remove(index))
    }

    /// The newest backup.
    pub fn last_backup(&self) -> Option<&Backup> {
        self.backups.last()
    }

    /// The backup created just before the newest one.
    pub fn previous_backup(&self) -> Option<&Backup> {
        let len = self.backups.len();
        if len < 2 {
            return None;
        }
        self.backups.get(len - 2)
    }

    /// Creation time of the newest backup, `None` when there are none.
    pub fn last_backup_time(&self) -> Option<DateTime<Utc>> {
        self.last_backup().map(|b| b.created_at)
    }
}
