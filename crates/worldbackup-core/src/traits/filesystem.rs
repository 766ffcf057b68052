//! Filesystem capability used for directory listing and file removal.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntryMeta {
    /// Base name of the entry.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Trait for the filesystem operations the engine and API need.
///
/// `read_dir` lists immediate children only; it never recurses.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug + 'static {
    /// List the immediate children of a directory.
    async fn read_dir(&self, path: &Path) -> AppResult<Vec<DirEntryMeta>>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &Path) -> AppResult<bool>;

    /// Delete a single file.
    async fn remove(&self, path: &Path) -> AppResult<()>;

    /// Rename a file or directory.
    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()>;

    /// Delete a directory and all its contents recursively.
    async fn remove_all(&self, path: &Path) -> AppResult<()>;

    /// Create a directory and any missing parents.
    async fn create_dir_all(&self, path: &Path) -> AppResult<()>;
}
