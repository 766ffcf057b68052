//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use worldbackup_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the watcher configuration
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(&config),
            OutputFormat::Table => println!("{:#?}", config),
        },
        ConfigCommand::Validate => match worldbackup_worker::validate(&config.watcher) {
            Ok(interval) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv(
                    "Server",
                    &format!("{}:{}", config.server.host, config.server.port),
                );
                output::print_kv("Watch dirs", &config.watcher.watch_dirs.join(", "));
                output::print_kv("Backup dir", &config.watcher.backup_dir);
                output::print_kv("Interval", &format!("{:?}", interval));
                output::print_kv("Data file", &config.storage.data_file);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e.message));
                return Err(e);
            }
        },
    }

    Ok(())
}
