//! CLI command definitions and dispatch.

pub mod config;
pub mod folder;
pub mod scan;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use worldbackup_core::config::AppConfig;
use worldbackup_core::error::AppError;
use worldbackup_core::traits::{RandomIdGenerator, SystemClock};
use worldbackup_database::Store;

/// World Backup: periodic zip snapshots of game world directories
#[derive(Debug, Parser)]
#[command(name = "world-backup", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "WORLDBACKUP_CONFIG", default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the watch scheduler and HTTP server
    Serve(serve::ServeArgs),
    /// Run a single scan pass and exit
    Scan,
    /// Inspect tracked folders, worlds, and backups
    Folder(folder::FolderArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Scan => scan::execute(&self.config, self.format).await,
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the data store named in the configuration
pub async fn open_store(config: &AppConfig) -> Result<Arc<Store>, AppError> {
    let store = Store::open(
        &config.storage.data_file,
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
    )
    .await?;
    Ok(Arc::new(store))
}
