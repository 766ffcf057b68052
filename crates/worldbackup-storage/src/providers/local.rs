//! Local filesystem provider.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use worldbackup_core::error::{AppError, ErrorKind};
use worldbackup_core::result::AppResult;
use worldbackup_core::traits::filesystem::{DirEntryMeta, FileSystem};

/// [`FileSystem`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a new local filesystem provider.
    pub fn new() -> Self {
        Self
    }
}

fn io_error(e: std::io::Error, action: &str, path: &Path) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Not found: {}", path.display()))
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to {action} {}", path.display()),
            e,
        )
    }
}

/// Stat one listed entry. An entry deleted after it was listed yields `None`.
async fn stat_entry(path: &Path, name: String) -> AppResult<Option<DirEntryMeta>> {
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Entry vanished while listing");
            return Ok(None);
        }
        Err(e) => return Err(io_error(e, "stat", path)),
    };
    let modified = meta.modified().map_err(|e| io_error(e, "stat", path))?;

    Ok(Some(DirEntryMeta {
        name,
        is_dir: meta.is_dir(),
        modified: DateTime::<Utc>::from(modified),
    }))
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_dir(&self, path: &Path) -> AppResult<Vec<DirEntryMeta>> {
        let mut reader = fs::read_dir(path)
            .await
            .map_err(|e| io_error(e, "list", path))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| io_error(e, "list", path))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(meta) = stat_entry(&entry.path(), name).await? {
                entries.push(meta);
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn exists(&self, path: &Path) -> AppResult<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| io_error(e, "stat", path))
    }

    async fn remove(&self, path: &Path) -> AppResult<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| io_error(e, "delete", path))?;
        debug!(path = %path.display(), "Deleted file");
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()> {
        fs::rename(from, to).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename {} -> {}", from.display(), to.display()),
                e,
            )
        })?;
        debug!(from = %from.display(), to = %to.display(), "Renamed");
        Ok(())
    }

    async fn remove_all(&self, path: &Path) -> AppResult<()> {
        fs::remove_dir_all(path)
            .await
            .map_err(|e| io_error(e, "delete directory", path))?;
        debug!(path = %path.display(), "Deleted directory tree");
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> AppResult<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| io_error(e, "create directory", path))
    }
}
