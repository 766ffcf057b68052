//! Change detection by modification time.

use std::sync::Arc;

use worldbackup_core::traits::FileSystem;
use worldbackup_entity::World;

/// Decides whether a world changed since its last backup.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
}

impl ChangeDetector {
    /// Create a detector listing directories through `fs`.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Whether any immediate child of the world directory was modified
    /// strictly after the newest backup.
    ///
    /// A world without backups is always changed. A listing failure is
    /// logged and reported as unchanged; the next pass retries.
    pub async fn has_changed(&self, world: &World) -> bool {
        let Some(last_backup) = world.last_backup_time() else {
            tracing::debug!(world = %world.id, "No backups yet");
            return true;
        };

        let entries = match self.fs.read_dir(&world.full_path).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    world = %world.id,
                    path = %world.full_path.display(),
                    error = %e,
                    "Failed to check world for changes"
                );
                return false;
            }
        };

        match entries.iter().find(|e| e.modified > last_backup) {
            Some(entry) => {
                tracing::debug!(world = %world.id, file = %entry.name, "Changed since last backup");
                true
            }
            None => false,
        }
    }
}
