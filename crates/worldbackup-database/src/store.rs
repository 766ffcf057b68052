//! Locked, JSON-file backed store.
//!
//! The store owns the only copy of the [`Database`]. Every reader and
//! writer goes through its [`RwLock`]; callers must not hold a guard across
//! filesystem or archive I/O. Saves write a sibling temp file and rename it
//! over the data file, and are serialized by a dedicated mutex.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use worldbackup_core::error::{AppError, ErrorKind};
use worldbackup_core::result::AppResult;
use worldbackup_core::traits::{Clock, IdGenerator};
use worldbackup_core::types::{BackupId, FolderId, WorldId};
use worldbackup_entity::World;

use crate::document::Database;

/// The single owner of the entity graph.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    data: RwLock<Database>,
    save_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Store {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty document. A file that exists but
    /// cannot be read or parsed is an error.
    pub async fn open(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> AppResult<Self> {
        let path = path.into();

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let db: Database = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Serialization,
                        format!("Failed to parse data file '{}'", path.display()),
                        e,
                    )
                })?;
                info!(
                    path = %path.display(),
                    folders = db.folders.len(),
                    "Loaded data file"
                );
                db
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No data file yet, starting empty");
                Database::new(clock.now())
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read data file '{}'", path.display()),
                    e,
                ));
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
            save_lock: Mutex::new(()),
            clock,
            ids,
        })
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The injected clock.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Fresh folder id.
    pub fn next_folder_id(&self) -> FolderId {
        FolderId::from_uuid(self.ids.next_uuid())
    }

    /// Fresh world id.
    pub fn next_world_id(&self) -> WorldId {
        WorldId::from_uuid(self.ids.next_uuid())
    }

    /// Fresh backup id.
    pub fn next_backup_id(&self) -> BackupId {
        BackupId::from_uuid(self.ids.next_uuid())
    }

    /// Shared access to the graph.
    pub async fn read(&self) -> RwLockReadGuard<'_, Database> {
        self.data.read().await
    }

    /// Exclusive access to the graph.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Database> {
        self.data.write().await
    }

    /// A deep copy of the whole graph.
    pub async fn snapshot(&self) -> Database {
        self.data.read().await.clone()
    }

    /// Return the id of the folder at `path`, registering it if needed.
    pub async fn resolve_folder(&self, path: &Path) -> FolderId {
        let mut db = self.data.write().await;
        if let Some(folder) = db.folder_by_path(path) {
            return folder.id;
        }

        let id = self.next_folder_id();
        db.add_folder(id, path, self.clock.now());
        info!(folder = %path.display(), id = %id, "Registered watch folder");
        id
    }

    /// Return a copy of the world named `name` in `folder`, registering it
    /// if needed.
    pub async fn resolve_world(&self, folder: FolderId, name: &str) -> AppResult<World> {
        let mut db = self.data.write().await;
        let folder = db
            .folder_mut(folder)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder} not found")))?;

        if let Some(world) = folder.world_by_name(name) {
            return Ok(world.clone());
        }

        let id = self.next_world_id();
        let world = folder.add_world(id, name, self.clock.now()).clone();
        info!(world = %world.full_path.display(), id = %id, "Discovered world");
        Ok(world)
    }

    /// Persist the current graph.
    pub async fn save(&self) -> AppResult<()> {
        let _guard = self.save_lock.lock().await;

        let bytes = {
            let mut db = self.data.write().await;
            db.last_save = Some(self.clock.now());
            serde_json::to_vec_pretty(&*db)?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write '{}'", tmp.display()),
                e,
            )
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace '{}'", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Saved data file");
        Ok(())
    }

    /// Final save before shutdown.
    pub async fn close(&self) -> AppResult<()> {
        self.save().await?;
        info!(path = %self.path.display(), "Store closed");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
