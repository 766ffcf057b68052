//! One full scan pass over every watched folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use worldbackup_core::result::AppResult;
use worldbackup_core::traits::FileSystem;
use worldbackup_core::types::FolderId;
use worldbackup_database::Store;

use crate::jobs::{BackupCreator, ChangeDetector, PurgePolicy};

/// Counters collected during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Folders whose listing succeeded.
    pub folders_scanned: usize,
    /// Folders skipped because they could not be listed.
    pub folders_skipped: usize,
    /// World directories visited.
    pub worlds_checked: usize,
    /// Backups written.
    pub backups_created: usize,
    /// Near-duplicate backups removed.
    pub backups_purged: usize,
}

/// Runs detection, backup, and purge over the configured folders.
#[derive(Debug, Clone)]
pub struct ScanRunner {
    store: Arc<Store>,
    fs: Arc<dyn FileSystem>,
    detector: ChangeDetector,
    creator: BackupCreator,
    purge: PurgePolicy,
    watch_dirs: Vec<PathBuf>,
}

impl ScanRunner {
    /// Create a runner over `watch_dirs`, scanned in the given order.
    pub fn new(
        store: Arc<Store>,
        fs: Arc<dyn FileSystem>,
        detector: ChangeDetector,
        creator: BackupCreator,
        purge: PurgePolicy,
        watch_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            store,
            fs,
            detector,
            creator,
            purge,
            watch_dirs,
        }
    }

    /// Register a folder record for every watched path and persist once.
    pub async fn register_folders(&self) -> AppResult<Vec<FolderId>> {
        let mut ids = Vec::with_capacity(self.watch_dirs.len());
        for (i, dir) in self.watch_dirs.iter().enumerate() {
            let id = self.store.resolve_folder(dir).await;
            tracing::info!(index = i, folder = %id, path = %dir.display(), "Watching folder");
            ids.push(id);
        }
        self.store.save().await?;
        Ok(ids)
    }

    /// Scan every folder once.
    ///
    /// A folder that cannot be listed is skipped; its `lastRun` is still
    /// stamped and the store saved, like every other folder.
    pub async fn run_pass(&self) -> ScanReport {
        let mut report = ScanReport::default();

        for dir in &self.watch_dirs {
            let folder_id = self.store.resolve_folder(dir).await;
            self.scan_folder(folder_id, dir, &mut report).await;

            {
                let now = self.store.now();
                let mut db = self.store.write().await;
                if let Some(folder) = db.folder_mut(folder_id) {
                    folder.last_run = Some(now);
                }
            }
            if let Err(e) = self.store.save().await {
                tracing::error!(folder = %folder_id, error = %e, "Failed to save after scan");
            }
        }

        tracing::info!(
            folders = report.folders_scanned,
            skipped = report.folders_skipped,
            worlds = report.worlds_checked,
            created = report.backups_created,
            purged = report.backups_purged,
            "Scan pass complete"
        );
        report
    }

    async fn scan_folder(&self, folder_id: FolderId, path: &Path, report: &mut ScanReport) {
        let entries = match self.fs.read_dir(path).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(folder = %folder_id, path = %path.display(), error = %e, "Failed to list folder");
                report.folders_skipped += 1;
                return;
            }
        };
        report.folders_scanned += 1;

        for entry in entries.iter().filter(|e| e.is_dir) {
            let world = match self.store.resolve_world(folder_id, &entry.name).await {
                Ok(world) => world,
                Err(e) => {
                    tracing::warn!(folder = %folder_id, world = %entry.name, error = %e, "Folder vanished during scan");
                    return;
                }
            };
            report.worlds_checked += 1;

            if !self.detector.has_changed(&world).await {
                tracing::debug!(world = %world.id, "Unchanged");
                continue;
            }

            if self
                .creator
                .create_backup(folder_id, path, &world)
                .await
                .is_some()
            {
                report.backups_created += 1;
                if self.purge.maybe_purge(folder_id, world.id).await.is_some() {
                    report.backups_purged += 1;
                }
            }
        }
    }
}
