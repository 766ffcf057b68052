//! One-off scan pass.
//!
//! Shares the data file with the server; do not run it while a server is
//! using the same `storage.data_file`.

use std::sync::Arc;

use worldbackup_core::error::AppError;
use worldbackup_core::traits::{Archiver, FileSystem};
use worldbackup_storage::{LocalFileSystem, ZipArchiver};
use worldbackup_worker::WatchScheduler;

use crate::output::{self, OutputFormat};

/// Execute the scan command
pub async fn execute(config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
    let archiver: Arc<dyn Archiver> = Arc::new(ZipArchiver::new());
    let scheduler = WatchScheduler::new(config.watcher.clone(), Arc::clone(&store), fs, archiver);

    let report = scheduler.run_once().await?;
    store.close().await?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            output::print_success("Scan complete");
            output::print_kv("Folders scanned", &report.folders_scanned.to_string());
            output::print_kv("Folders skipped", &report.folders_skipped.to_string());
            output::print_kv("Worlds checked", &report.worlds_checked.to_string());
            output::print_kv("Backups created", &report.backups_created.to_string());
            output::print_kv("Backups purged", &report.backups_purged.to_string());
        }
    }

    Ok(())
}
