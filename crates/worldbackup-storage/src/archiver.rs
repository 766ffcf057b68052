//! Zip archiver.
//!
//! Archives are written and extracted on the blocking thread pool. Entry
//! names are relative to the base directory handed to [`Archiver::zip`],
//! always `/`-separated, and directories get their own entries.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use worldbackup_core::error::{AppError, ErrorKind};
use worldbackup_core::result::AppResult;
use worldbackup_core::traits::archive::Archiver;

/// [`Archiver`] producing deflate-compressed zip files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    /// Create a new zip archiver.
    pub fn new() -> Self {
        Self
    }

    fn write_archive(base_dir: &Path, source: &Path, destination: &Path) -> AppResult<u64> {
        let root = base_dir.join(source);
        if !root.is_dir() {
            return Err(AppError::not_found(format!(
                "Nothing to archive at {}",
                root.display()
            )));
        }

        let file = File::create(destination).map_err(|e| {
            storage_error(format!("Failed to create {}", destination.display()), e)
        })?;
        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut files = 0u64;
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                storage_error(format!("Failed to walk {}", root.display()), e)
            })?;
            let relative = entry.path().strip_prefix(base_dir).map_err(|_| {
                AppError::internal(format!(
                    "{} escaped base directory {}",
                    entry.path().display(),
                    base_dir.display()
                ))
            })?;
            let name = entry_name(relative);

            if entry.file_type().is_dir() {
                writer
                    .add_directory(format!("{name}/"), options)
                    .map_err(|e| storage_error(format!("Failed to add {name}/"), e))?;
            } else if entry.file_type().is_file() {
                writer
                    .start_file(name.clone(), options)
                    .map_err(|e| storage_error(format!("Failed to add {name}"), e))?;
                let mut input = File::open(entry.path()).map_err(|e| {
                    storage_error(format!("Failed to open {}", entry.path().display()), e)
                })?;
                io::copy(&mut input, &mut writer)
                    .map_err(|e| storage_error(format!("Failed to compress {name}"), e))?;
                files += 1;
            }
        }

        writer.finish().map_err(|e| {
            storage_error(format!("Failed to finalize {}", destination.display()), e)
        })?;
        Ok(files)
    }

    fn extract_archive(source: &Path, destination: &Path) -> AppResult<u64> {
        let file = File::open(source).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AppError::not_found(format!("Archive not found: {}", source.display()))
            } else {
                storage_error(format!("Failed to open {}", source.display()), e)
            }
        })?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| storage_error(format!("Failed to read {}", source.display()), e))?;

        fs::create_dir_all(destination).map_err(|e| {
            storage_error(format!("Failed to create {}", destination.display()), e)
        })?;

        let mut files = 0u64;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| storage_error(format!("Failed to read entry {i}"), e))?;

            let enclosed = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    warn!(entry = entry.name(), "Skipping archive entry outside target");
                    continue;
                }
            };
            let out_path = destination.join(&enclosed);

            if entry.is_dir() {
                fs::create_dir_all(&out_path).map_err(|e| {
                    storage_error(format!("Failed to create {}", out_path.display()), e)
                })?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    storage_error(format!("Failed to create {}", parent.display()), e)
                })?;
            }
            let mut output = File::create(&out_path).map_err(|e| {
                storage_error(format!("Failed to create {}", out_path.display()), e)
            })?;
            io::copy(&mut entry, &mut output).map_err(|e| {
                storage_error(format!("Failed to extract {}", out_path.display()), e)
            })?;
            files += 1;
        }

        Ok(files)
    }
}

fn storage_error(
    message: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> AppError {
    AppError::with_source(ErrorKind::Storage, message, source)
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

async fn run_blocking<F>(task: F) -> AppResult<u64>
where
    F: FnOnce() -> AppResult<u64> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::internal(format!("Archive task failed: {e}")))?
}

#[async_trait]
impl Archiver for ZipArchiver {
    async fn zip(&self, base_dir: &Path, source: &Path, destination: &Path) -> AppResult<()> {
        let base_dir = base_dir.to_path_buf();
        let source = source.to_path_buf();
        let dest: PathBuf = destination.to_path_buf();

        let result = {
            let dest = dest.clone();
            run_blocking(move || Self::write_archive(&base_dir, &source, &dest)).await
        };

        match result {
            Ok(files) => {
                debug!(archive = %dest.display(), files, "Wrote archive");
                Ok(())
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&dest).await {
                    if rm.kind() != io::ErrorKind::NotFound {
                        warn!(archive = %dest.display(), error = %rm, "Failed to remove partial archive");
                    }
                }
                Err(e)
            }
        }
    }

    async fn unzip(&self, source: &Path, destination: &Path) -> AppResult<()> {
        let source = source.to_path_buf();
        let dest = destination.to_path_buf();
        let log_source = source.clone();

        let files = run_blocking(move || Self::extract_archive(&source, &dest)).await?;
        debug!(archive = %log_source.display(), files, "Extracted archive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use tempfile::TempDir;

    use super::*;

    fn make_world(base: &Path) {
        let world = base.join("My World");
        fs::create_dir_all(world.join("region")).unwrap();
        fs::write(world.join("level.dat"), b"level").unwrap();
        fs::write(world.join("region/r.0.0.mca"), b"chunk").unwrap();
    }

    #[tokio::test]
    async fn test_zip_stores_world_relative_names() {
        let dir = TempDir::new().unwrap();
        let saves = dir.path().join("saves");
        make_world(&saves);
        let dest = dir.path().join("out.zip");

        ZipArchiver::new()
            .zip(&saves, Path::new("My World"), &dest)
            .await
            .unwrap();

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            [
                "My World/",
                "My World/level.dat",
                "My World/region/",
                "My World/region/r.0.0.mca"
            ]
        );

        let mut content = String::new();
        archive
            .by_name("My World/level.dat")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "level");
    }

    #[tokio::test]
    async fn test_unzip_restores_tree() {
        let dir = TempDir::new().unwrap();
        let saves = dir.path().join("saves");
        make_world(&saves);
        let dest = dir.path().join("out.zip");
        let archiver = ZipArchiver::new();
        archiver
            .zip(&saves, Path::new("My World"), &dest)
            .await
            .unwrap();

        let restored = dir.path().join("restored");
        archiver.unzip(&dest, &restored).await.unwrap();
        assert_eq!(
            fs::read(restored.join("My World/region/r.0.0.mca")).unwrap(),
            b"chunk"
        );
    }

    #[tokio::test]
    async fn test_failed_zip_leaves_no_archive() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.zip");

        let err = ZipArchiver::new()
            .zip(dir.path(), Path::new("missing"), &dest)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_unzip_skips_escaping_entries() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("evil.zip");
        {
            let mut writer = ZipWriter::new(File::create(&archive_path).unwrap());
            let options = SimpleFileOptions::default();
            writer.start_file("../escaped.txt", options).unwrap();
            writer.write_all(b"bad").unwrap();
            writer.start_file("World/ok.txt", options).unwrap();
            writer.write_all(b"good").unwrap();
            writer.finish().unwrap();
        }

        let target = dir.path().join("target");
        ZipArchiver::new()
            .unzip(&archive_path, &target)
            .await
            .unwrap();
        assert!(target.join("World/ok.txt").exists());
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[tokio::test]
    async fn test_unzip_missing_archive_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ZipArchiver::new()
            .unzip(&dir.path().join("none.zip"), dir.path())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let path: PathBuf = ["World", "region", "r.0.0.mca"].iter().collect();
        assert_eq!(entry_name(&path), "World/region/r.0.0.mca");
    }
}
