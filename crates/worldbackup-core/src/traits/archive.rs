//! Archive capability used to snapshot and restore worlds.

use std::path::Path;

use async_trait::async_trait;

use crate::result::AppResult;

/// Produces and extracts zip archives.
///
/// The base directory is passed explicitly so archive entries are stored
/// relative to it; implementations must never change the process working
/// directory.
#[async_trait]
pub trait Archiver: Send + Sync + std::fmt::Debug + 'static {
    /// Archive `base_dir/source` into `destination`, storing entries as
    /// `source/...`.
    async fn zip(&self, base_dir: &Path, source: &Path, destination: &Path) -> AppResult<()>;

    /// Extract the archive at `source` into the `destination` directory.
    async fn unzip(&self, source: &Path, destination: &Path) -> AppResult<()>;
}
