//! Folder, world, and backup operations.
//!
//! Every mutating operation touches the filesystem first and the entity
//! graph only afterwards, so a failed file operation leaves the graph
//! unchanged. The store lock is never held across I/O.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use worldbackup_core::error::AppError;
use worldbackup_core::traits::{Archiver, FileSystem};
use worldbackup_core::types::{BackupId, FolderId, WorldId};
use worldbackup_database::{Database, Store};
use worldbackup_entity::{Backup, Folder, FolderListItem, World};

/// Operations on tracked folders and their worlds.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Entity store.
    store: Arc<Store>,
    /// Filesystem access.
    fs: Arc<dyn FileSystem>,
    /// Used for restores.
    archiver: Arc<dyn Archiver>,
    /// Where backup archives live.
    backup_dir: PathBuf,
}

fn find_folder(db: &Database, id: FolderId) -> Result<&Folder, AppError> {
    db.folder(id)
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
}

fn find_world(db: &Database, folder: FolderId, world: WorldId) -> Result<&World, AppError> {
    find_folder(db, folder)?
        .world(world)
        .ok_or_else(|| AppError::not_found(format!("World {world} not found")))
}

fn find_backup(
    db: &Database,
    folder: FolderId,
    world: WorldId,
    backup: BackupId,
) -> Result<(&Folder, &World, &Backup), AppError> {
    let f = find_folder(db, folder)?;
    let w = find_world(db, folder, world)?;
    let b = w
        .backup(backup)
        .ok_or_else(|| AppError::not_found(format!("Backup {backup} not found")))?;
    Ok((f, w, b))
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        store: Arc<Store>,
        fs: Arc<dyn FileSystem>,
        archiver: Arc<dyn Archiver>,
        backup_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            fs,
            archiver,
            backup_dir,
        }
    }

    /// Summaries of all tracked folders.
    pub async fn list_folders(&self) -> Vec<FolderListItem> {
        let db = self.store.read().await;
        db.folders().iter().map(Folder::list_item).collect()
    }

    /// A folder with its worlds.
    pub async fn get_folder(&self, folder_id: FolderId) -> Result<Folder, AppError> {
        let db = self.store.read().await;
        find_folder(&db, folder_id).cloned()
    }

    /// The worlds of a folder, with their backups.
    pub async fn list_worlds(&self, folder_id: FolderId) -> Result<Vec<World>, AppError> {
        let db = self.store.read().await;
        Ok(find_folder(&db, folder_id)?.worlds.clone())
    }

    /// A single world.
    pub async fn get_world(
        &self,
        folder_id: FolderId,
        world_id: WorldId,
    ) -> Result<World, AppError> {
        let db = self.store.read().await;
        find_world(&db, folder_id, world_id).cloned()
    }

    /// Delete a backup archive and its record; returns the updated world.
    ///
    /// A missing archive still drops the record. A failed deletion keeps it.
    pub async fn delete_backup(
        &self,
        folder_id: FolderId,
        world_id: WorldId,
        backup_id: BackupId,
    ) -> Result<World, AppError> {
        let name = {
            let db = self.store.read().await;
            let (_, _, backup) = find_backup(&db, folder_id, world_id, backup_id)?;
            backup.name.clone()
        };

        let path = self.backup_dir.join(&name);
        info!(folder = %folder_id, world = %world_id, backup = %backup_id, path = %path.display(), "Deleting backup");

        if self.fs.exists(&path).await? {
            self.fs.remove(&path).await.map_err(|e| {
                AppError::internal(format!("Failed to delete backup {name}: {e}"))
            })?;
        } else {
            warn!(backup = %backup_id, path = %path.display(), "Archive already missing");
        }

        let world = {
            let now = self.store.now();
            let mut db = self.store.write().await;
            let folder = db
                .folder_mut(folder_id)
                .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
            folder.modified_at = now;
            let world = folder
                .world_mut(world_id)
                .ok_or_else(|| AppError::not_found(format!("World {world_id} not found")))?;
            world.remove_backup(backup_id);
            world.clone()
        };

        self.persist().await;
        Ok(world)
    }

    /// Restore a world from a backup.
    ///
    /// The current world directory is moved aside to
    /// `<folder>/<name>_<unix seconds>` and the archive is extracted into the
    /// folder. If extraction fails the world is moved back. The entity
    /// graph is not modified.
    pub async fn restore_backup(
        &self,
        folder_id: FolderId,
        world_id: WorldId,
        backup_id: BackupId,
    ) -> Result<World, AppError> {
        let (folder_path, world, name) = {
            let db = self.store.read().await;
            let (folder, world, backup) = find_backup(&db, folder_id, world_id, backup_id)?;
            (folder.path.clone(), world.clone(), backup.name.clone())
        };

        let archive = self.backup_dir.join(&name);
        if !self.fs.exists(&archive).await? {
            return Err(AppError::not_found(format!(
                "Backup archive {} is missing",
                archive.display()
            )));
        }

        info!(folder = %folder_id, world = %world_id, backup = %backup_id, "Restoring backup");

        let mut moved_aside = None;
        if self.fs.exists(&world.full_path).await? {
            let aside = folder_path.join(format!(
                "{}_{}",
                world.name,
                self.store.now().timestamp()
            ));
            self.fs
                .rename(&world.full_path, &aside)
                .await
                .map_err(|e| AppError::internal(format!("Failed to move world aside: {e}")))?;
            info!(world = %world_id, moved_to = %aside.display(), "Moved current world aside");
            moved_aside = Some(aside);
        }

        if let Err(e) = self.archiver.unzip(&archive, &folder_path).await {
            if let Some(aside) = moved_aside {
                self.put_back(&aside, &world.full_path).await;
            }
            return Err(AppError::internal(format!("Failed to extract {name}: {e}")));
        }

        Ok(world)
    }

    /// Delete a world directory tree and then its record.
    pub async fn remove_world(
        &self,
        folder_id: FolderId,
        world_id: WorldId,
    ) -> Result<World, AppError> {
        let full_path = {
            let db = self.store.read().await;
            find_world(&db, folder_id, world_id)?.full_path.clone()
        };

        info!(folder = %folder_id, world = %world_id, path = %full_path.display(), "Removing world");

        match self.fs.remove_all(&full_path).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(world = %world_id, "World directory already gone");
            }
            Err(e) => {
                return Err(AppError::internal(format!(
                    "Failed to delete world directory: {e}"
                )));
            }
        }

        let removed = {
            let now = self.store.now();
            let mut db = self.store.write().await;
            let folder = db
                .folder_mut(folder_id)
                .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
            let removed = folder
                .remove_world(world_id)
                .ok_or_else(|| AppError::not_found(format!("World {world_id} not found")))?;
            folder.modified_at = now;
            removed
        };

        self.persist().await;
        Ok(removed)
    }

    /// Undo the move-aside after a failed extraction.
    async fn put_back(&self, aside: &Path, original: &Path) {
        match self.fs.remove_all(original).await {
            Ok(()) => warn!(path = %original.display(), "Discarded partial restore"),
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                error!(path = %original.display(), error = %e, "Failed to discard partial restore");
                return;
            }
        }
        match self.fs.rename(aside, original).await {
            Ok(()) => info!(path = %original.display(), "Moved world back after failed restore"),
            Err(e) => error!(from = %aside.display(), error = %e, "Failed to move world back"),
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save().await {
            warn!(error = %e, "Failed to save after API change");
        }
    }
}
