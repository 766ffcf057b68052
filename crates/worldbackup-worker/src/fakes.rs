//! In-memory capabilities for engine tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use worldbackup_core::error::AppError;
use worldbackup_core::result::AppResult;
use worldbackup_core::traits::{
    Archiver, DirEntryMeta, FileSystem, ManualClock, SequentialIdGenerator,
};
use worldbackup_database::Store;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub async fn store(clock: Arc<ManualClock>) -> (TempDir, Arc<Store>) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(
        dir.path().join("data.json"),
        clock,
        Arc::new(SequentialIdGenerator::new()),
    )
    .await
    .unwrap();
    (dir, Arc::new(store))
}

/// Directory listings and files are plain maps; every call is recorded.
#[derive(Debug, Default)]
pub struct FakeFileSystem {
    listings: Mutex<HashMap<PathBuf, Vec<DirEntryMeta>>>,
    files: Mutex<HashSet<PathBuf>>,
    failing: Mutex<HashSet<PathBuf>>,
    missing: Mutex<HashSet<PathBuf>>,
    pub removed: Mutex<Vec<PathBuf>>,
    pub created: Mutex<Vec<PathBuf>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(&self, path: impl Into<PathBuf>, entries: Vec<DirEntryMeta>) {
        self.listings.lock().unwrap().insert(path.into(), entries);
    }

    pub fn file(&self, path: impl Into<PathBuf>) {
        self.files.lock().unwrap().insert(path.into());
    }

    pub fn fail(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }

    /// Make `remove` report `path` as already deleted.
    pub fn gone(&self, path: impl Into<PathBuf>) {
        self.missing.lock().unwrap().insert(path.into());
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }

    fn check(&self, path: &Path) -> AppResult<()> {
        if self.failing.lock().unwrap().contains(path) {
            return Err(AppError::storage(format!("injected failure: {}", path.display())));
        }
        Ok(())
    }
}

pub fn entry(name: &str, is_dir: bool, modified: DateTime<Utc>) -> DirEntryMeta {
    DirEntryMeta {
        name: name.to_string(),
        is_dir,
        modified,
    }
}

#[async_trait]
impl FileSystem for FakeFileSystem {
    async fn read_dir(&self, path: &Path) -> AppResult<Vec<DirEntryMeta>> {
        self.check(path)?;
        self.listings
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no listing for {}", path.display())))
    }

    async fn exists(&self, path: &Path) -> AppResult<bool> {
        Ok(self.files.lock().unwrap().contains(path)
            || self.listings.lock().unwrap().contains_key(path))
    }

    async fn remove(&self, path: &Path) -> AppResult<()> {
        self.check(path)?;
        if self.missing.lock().unwrap().contains(path) {
            return Err(AppError::not_found(format!("no file at {}", path.display())));
        }
        self.files.lock().unwrap().remove(path);
        self.removed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn rename(&self, from: &Path, _to: &Path) -> AppResult<()> {
        self.check(from)
    }

    async fn remove_all(&self, path: &Path) -> AppResult<()> {
        self.check(path)?;
        self.listings.lock().unwrap().remove(path);
        self.removed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> AppResult<()> {
        self.check(path)?;
        self.created.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Records every zip request; fails when told to.
#[derive(Debug, Default)]
pub struct FakeArchiver {
    pub fail: Mutex<bool>,
    pub zipped: Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>,
}

impl FakeArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let archiver = Self::default();
        *archiver.fail.lock().unwrap() = true;
        archiver
    }

    pub fn zipped(&self) -> Vec<(PathBuf, PathBuf, PathBuf)> {
        self.zipped.lock().unwrap().clone()
    }
}

#[async_trait]
impl Archiver for FakeArchiver {
    async fn zip(&self, base_dir: &Path, source: &Path, destination: &Path) -> AppResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::storage("injected zip failure"));
        }
        self.zipped.lock().unwrap().push((
            base_dir.to_path_buf(),
            source.to_path_buf(),
            destination.to_path_buf(),
        ));
        Ok(())
    }

    async fn unzip(&self, _source: &Path, _destination: &Path) -> AppResult<()> {
        Ok(())
    }
}
