//! The persisted root document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worldbackup_core::types::{FolderId, WorldId};
use worldbackup_entity::{Folder, World};

/// Root of the entity graph, serialized as a single JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /// When the document was first created.
    pub created_at: DateTime<Utc>,
    /// When the document was last written to disk.
    #[serde(default)]
    pub last_save: Option<DateTime<Utc>>,
    /// Tracked folders in registration order.
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Database {
    /// Create an empty document.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            last_save: None,
            folders: Vec::new(),
        }
    }

    /// All folders in insertion order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Register a folder. Always appends; see [`Self::folder_by_path`].
    pub fn add_folder(
        &mut self,
        id: FolderId,
        path: impl Into<PathBuf>,
        now: DateTime<Utc>,
    ) -> &mut Folder {
        let index = self.folders.len();
        self.folders.push(Folder::new(id, path, now));
        &mut self.folders[index]
    }

    /// Find a folder by id.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Find a folder by id for mutation.
    pub fn folder_mut(&mut self, id: FolderId) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// Find a folder by exact, case-sensitive path.
    pub fn folder_by_path(&self, path: &Path) -> Option<&Folder> {
        self.folders.iter().find(|f| f.is_at(path))
    }

    /// Find a world of a folder.
    pub fn world(&self, folder: FolderId, world: WorldId) -> Option<&World> {
        self.folder(folder)?.world(world)
    }

    /// Find a world of a folder for mutation.
    pub fn world_mut(&mut self, folder: FolderId, world: WorldId) -> Option<&mut World> {
        self.folder_mut(folder)?.world_mut(world)
    }
}
