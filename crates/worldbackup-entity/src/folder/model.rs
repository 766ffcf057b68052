//! Folder entity model.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worldbackup_core::types::{FolderId, WorldId};

use crate::world::World;

/// A watched directory and the worlds discovered inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// When the folder was first registered.
    pub created_at: DateTime<Utc>,
    /// Last time the folder's world list or backups changed.
    pub modified_at: DateTime<Utc>,
    /// Absolute path of the watched directory.
    pub path: PathBuf,
    /// When the last scan of this folder finished.
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Worlds, in discovery order.
    #[serde(default)]
    pub worlds: Vec<World>,
}

impl Folder {
    /// Create an empty folder record.
    pub fn new(id: FolderId, path: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            modified_at: now,
            path: path.into(),
            last_run: None,
            worlds: Vec::new(),
        }
    }

    /// Whether this record is for `path`. Comparison is exact.
    pub fn is_at(&self, path: &Path) -> bool {
        self.path == path
    }

    /// Append a new world named `name` and return it.
    ///
    /// Callers are expected to check [`Self::world_by_name`] first; this
    /// always appends.
    pub fn add_world(
        &mut self,
        id: WorldId,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &mut World {
        let world = World::new(id, &self.path, name, now);
        let index = self.worlds.len();
        self.worlds.push(world);
        self.modified_at = now;
        &mut self.worlds[index]
    }

    /// Find a world by id.
    pub fn world(&self, id: WorldId) -> Option<&World> {
        self.worlds.iter().find(|w| w.id == id)
    }

    /// Find a world by id for mutation.
    pub fn world_mut(&mut self, id: WorldId) -> Option<&mut World> {
        self.worlds.iter_mut().find(|w| w.id == id)
    }

    /// Find a world by directory name.
    pub fn world_by_name(&self, name: &str) -> Option<&World> {
        self.worlds.iter().find(|w| w.name == name)
    }

    /// Remove a world record.
    pub fn remove_world(&mut self, id: WorldId) -> Option<World> {
        let index = self.worlds.iter().position(|w| w.id == id)?;
        Some(self.worlds.remove(index))
    }

    /// Summary row used by folder listings.
    pub fn list_item(&self) -> FolderListItem {
        FolderListItem {
            id: self.id,
            modified_at: self.modified_at,
            path: self.path.clone(),
            last_run: self.last_run,
            number_of_worlds: self.worlds.len(),
        }
    }
}

/// Flat folder summary without the nested worlds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListItem {
    /// Folder identifier.
    pub id: FolderId,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
    /// Watched directory.
    pub path: PathBuf,
    /// Last completed scan.
    pub last_run: Option<DateTime<Utc>>,
    /// How many worlds the folder holds.
    pub number_of_worlds: usize,
}
