//! Folder, world, and backup inspection commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use worldbackup_core::error::AppError;
use worldbackup_core::types::{FolderId, WorldId};
use worldbackup_entity::World;
use worldbackup_service::FolderService;
use worldbackup_storage::{LocalFileSystem, ZipArchiver};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List tracked folders
    List,
    /// List the worlds of a folder
    Worlds {
        /// Folder ID
        folder_id: FolderId,
    },
    /// List the backups of a world
    Backups {
        /// Folder ID
        folder_id: FolderId,
        /// World ID
        world_id: WorldId,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Path
    path: String,
    /// Worlds
    worlds: usize,
    /// Last run
    last_run: String,
    /// Modified at
    modified_at: String,
}

/// World display row
#[derive(Debug, Serialize, Tabled)]
struct WorldRow {
    /// World ID
    id: String,
    /// Name
    name: String,
    /// Backups
    backups: usize,
    /// Last backup
    last_backup: String,
}

impl From<&World> for WorldRow {
    fn from(w: &World) -> Self {
        Self {
            id: w.id.to_string(),
            name: w.name.clone(),
            backups: w.backups.len(),
            last_backup: output::format_time(w.last_backup_time()),
        }
    }
}

/// Backup display row
#[derive(Debug, Serialize, Tabled)]
struct BackupRow {
    /// Backup ID
    id: String,
    /// Archive file name
    name: String,
    /// Created at
    created_at: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;
    let service = FolderService::new(
        store,
        Arc::new(LocalFileSystem::new()),
        Arc::new(ZipArchiver::new()),
        config.watcher.backup_path(),
    );

    match &args.command {
        FolderCommand::List => {
            let rows: Vec<FolderRow> = service
                .list_folders()
                .await
                .into_iter()
                .map(|f| FolderRow {
                    id: f.id.to_string(),
                    path: f.path.display().to_string(),
                    worlds: f.number_of_worlds,
                    last_run: output::format_time(f.last_run),
                    modified_at: output::format_time(Some(f.modified_at)),
                })
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Worlds { folder_id } => {
            let worlds = service.list_worlds(*folder_id).await?;
            let rows: Vec<WorldRow> = worlds.iter().map(WorldRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Backups {
            folder_id,
            world_id,
        } => {
            let world = service.get_world(*folder_id, *world_id).await?;
            let rows: Vec<BackupRow> = world
                .backups
                .iter()
                .rev()
                .map(|b| BackupRow {
                    id: b.id.to_string(),
                    name: b.name.clone(),
                    created_at: output::format_time(Some(b.created_at)),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
