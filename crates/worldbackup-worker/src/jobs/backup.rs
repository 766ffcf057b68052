//! Backup creation for a single world.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;

use worldbackup_core::traits::{Archiver, FileSystem};
use worldbackup_core::types::{BackupId, FolderId, WorldId};
use worldbackup_database::Store;
use worldbackup_entity::World;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid name pattern"));

/// Replace every run of non-alphanumeric characters with one underscore.
pub fn clean_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// Archive file name for a backup of `world_name` taken at `at`.
///
/// `My World!` with id `…` at 2024-06-01 12:00:00 becomes
/// `My_World_-<id>-20240601T120000.zip`.
pub fn backup_name(world_name: &str, world_id: WorldId, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}.zip",
        clean_name(world_name),
        world_id,
        at.format("%Y%m%dT%H%M%S")
    )
}

/// Archives one world and records the backup.
#[derive(Debug, Clone)]
pub struct BackupCreator {
    store: Arc<Store>,
    archiver: Arc<dyn Archiver>,
    fs: Arc<dyn FileSystem>,
    backup_dir: PathBuf,
}

impl BackupCreator {
    /// Create a backup creator writing archives into `backup_dir`.
    pub fn new(
        store: Arc<Store>,
        archiver: Arc<dyn Archiver>,
        fs: Arc<dyn FileSystem>,
        backup_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            archiver,
            fs,
            backup_dir,
        }
    }

    /// Directory receiving the archives.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Archive `world` (a snapshot taken from the store) and append a
    /// backup record to the live world.
    ///
    /// Returns the new backup's id, or `None` when archiving failed or the
    /// world was removed while the archive was being written.
    pub async fn create_backup(
        &self,
        folder_id: FolderId,
        folder_path: &Path,
        world: &World,
    ) -> Option<BackupId> {
        let now = self.store.now();
        let name = backup_name(&world.name, world.id, now);
        let destination = self.backup_dir.join(&name);

        tracing::info!(world = %world.id, backup = %name, "Creating backup");

        if let Err(e) = self
            .archiver
            .zip(folder_path, Path::new(&world.name), &destination)
            .await
        {
            tracing::error!(world = %world.id, backup = %name, error = %e, "Backup failed");
            return None;
        }

        let id = {
            let mut db = self.store.write().await;
            match db.world_mut(folder_id, world.id) {
                Some(live) => {
                    let id = self.store.next_backup_id();
                    live.add_backup(id, name.clone(), now);
                    Some(id)
                }
                None => None,
            }
        };

        if id.is_none() {
            tracing::warn!(
                world = %world.id,
                backup = %name,
                "World removed while archiving, discarding archive"
            );
            if let Err(e) = self.fs.remove(&destination).await {
                tracing::warn!(backup = %name, error = %e, "Failed to discard orphan archive");
            }
        }

        id
    }
}
