//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use worldbackup_core::config::AppConfig;
use worldbackup_database::Store;
use worldbackup_service::FolderService;
use worldbackup_worker::SchedulerState;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Entity store.
    pub store: Arc<Store>,
    /// Folder, world, and backup operations.
    pub folder_service: Arc<FolderService>,
    /// Watch scheduler lifecycle.
    pub scheduler: watch::Receiver<SchedulerState>,
    /// When the server started.
    pub started_at: Instant,
}

impl AppState {
    /// Creates the shared state.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<Store>,
        folder_service: Arc<FolderService>,
        scheduler: watch::Receiver<SchedulerState>,
    ) -> Self {
        Self {
            config,
            store,
            folder_service,
            scheduler,
            started_at: Instant::now(),
        }
    }
}
