//! Near-duplicate backup purge.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use worldbackup_core::traits::FileSystem;
use worldbackup_core::types::{BackupId, FolderId, WorldId};
use worldbackup_database::Store;

/// Slack added to the check interval when deciding whether the previous
/// backup is too recent.
pub const PURGE_GRACE: Duration = Duration::from_secs(2);

/// Removes the second-newest backup of a world when it was taken less than
/// one interval (plus [`PURGE_GRACE`]) ago.
#[derive(Debug, Clone)]
pub struct PurgePolicy {
    store: Arc<Store>,
    fs: Arc<dyn FileSystem>,
    backup_dir: PathBuf,
    interval: Duration,
}

impl PurgePolicy {
    /// Create a purge policy for the given check interval.
    pub fn new(
        store: Arc<Store>,
        fs: Arc<dyn FileSystem>,
        backup_dir: PathBuf,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            fs,
            backup_dir,
            interval,
        }
    }

    /// Apply the policy to the most recent pair of backups.
    ///
    /// The archive is deleted first; the record is dropped only when that
    /// succeeds (an archive that is already gone counts as deleted).
    pub async fn maybe_purge(&self, folder_id: FolderId, world_id: WorldId) -> Option<BackupId> {
        let previous = {
            let db = self.store.read().await;
            db.world(folder_id, world_id)?.previous_backup()?.clone()
        };

        let buffer = chrono::Duration::from_std(self.interval + PURGE_GRACE).ok()?;
        let cutoff = self.store.now() - buffer;
        if previous.created_at <= cutoff {
            return None;
        }

        let path = self.backup_dir.join(&previous.name);
        match self.fs.remove(&path).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(backup = %previous.name, "Archive already gone, dropping record");
            }
            Err(e) => {
                tracing::error!(backup = %previous.name, error = %e, "Failed to purge backup");
                return None;
            }
        }

        let removed = {
            let mut db = self.store.write().await;
            db.world_mut(folder_id, world_id)
                .and_then(|w| w.remove_backup(previous.id))
        };

        removed.map(|b| {
            tracing::info!(world = %world_id, backup = %b.name, "Purged near-duplicate backup");
            b.id
        })
    }
}
