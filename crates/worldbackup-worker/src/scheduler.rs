//! Interval scheduler driving the scan loop.
//!
//! Lifecycle: `Idle → Validating → Running → Scheduled → Stopped`. A
//! validation failure returns to `Idle`. `start` performs the first pass
//! before returning; later passes run on a background task that only
//! checks for the stop signal while sleeping, so an in-flight pass always
//! finishes.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use worldbackup_core::config::WatcherConfig;
use worldbackup_core::error::AppError;
use worldbackup_core::result::AppResult;
use worldbackup_core::traits::{Archiver, FileSystem};
use worldbackup_database::Store;

use crate::jobs::{BackupCreator, ChangeDetector, PurgePolicy};
use crate::runner::{ScanReport, ScanRunner};

/// Where the scheduler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Not started, or start was rejected.
    Idle,
    /// Checking configuration.
    Validating,
    /// Registering folders and running the first pass.
    Running,
    /// Sleeping between passes.
    Scheduled,
    /// The background loop has exited.
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Running => "running",
            Self::Scheduled => "scheduled",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Check that the watcher configuration can drive a scheduler and return
/// the parsed interval.
pub fn validate(config: &WatcherConfig) -> AppResult<Duration> {
    if config.watch_dirs.iter().all(|d| d.trim().is_empty()) {
        return Err(AppError::configuration("No paths to watch"));
    }
    config.check_interval()
}

/// Periodic watch-detect-backup-purge scheduler.
pub struct WatchScheduler {
    config: WatcherConfig,
    store: Arc<Store>,
    fs: Arc<dyn FileSystem>,
    archiver: Arc<dyn Archiver>,
    state: Arc<watch::Sender<SchedulerState>>,
}

impl fmt::Debug for WatchScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchScheduler")
            .field("watch_dirs", &self.config.watch_dirs)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl WatchScheduler {
    /// Create an idle scheduler.
    pub fn new(
        config: WatcherConfig,
        store: Arc<Store>,
        fs: Arc<dyn FileSystem>,
        archiver: Arc<dyn Archiver>,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            config,
            store,
            fs,
            archiver,
            state: Arc::new(state),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Observe lifecycle changes.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Validate, register folders, and run exactly one pass. The scheduler
    /// is back to `Idle` when this returns.
    pub async fn run_once(&self) -> AppResult<ScanReport> {
        let (runner, _) = self.prepare().await?;
        let report = runner.run_pass().await;
        self.state.send_replace(SchedulerState::Idle);
        Ok(report)
    }

    /// Validate, register folders, run the first pass, then spawn the
    /// interval loop. The loop exits when `cancel` turns `true` or its
    /// sender is dropped.
    pub async fn start(&self, mut cancel: watch::Receiver<bool>) -> AppResult<JoinHandle<()>> {
        let (runner, interval) = self.prepare().await?;
        runner.run_pass().await;

        self.state.send_replace(SchedulerState::Scheduled);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            tracing::info!(interval = ?interval, "Watch scheduler started");
            loop {
                tokio::select! {
                    changed = cancel.changed() => {
                        if changed.is_err() || *cancel.borrow() {
                            tracing::info!("Watch scheduler received shutdown signal");
                            break;
                        }
                    }
                    _ = time::sleep(interval) => {
                        tracing::info!("Checking watched folders");
                        state.send_replace(SchedulerState::Running);
                        runner.run_pass().await;
                        state.send_replace(SchedulerState::Scheduled);
                    }
                }
            }
            state.send_replace(SchedulerState::Stopped);
            tracing::info!("Watch scheduler stopped");
        });

        Ok(handle)
    }

    async fn prepare(&self) -> AppResult<(ScanRunner, Duration)> {
        self.state.send_replace(SchedulerState::Validating);
        let interval = match validate(&self.config) {
            Ok(interval) => interval,
            Err(e) => {
                self.state.send_replace(SchedulerState::Idle);
                return Err(e);
            }
        };

        let backup_dir = self.config.backup_path();
        if let Err(e) = self.fs.create_dir_all(&backup_dir).await {
            self.state.send_replace(SchedulerState::Idle);
            return Err(AppError::configuration(format!(
                "Cannot use backup directory '{}': {e}",
                backup_dir.display()
            )));
        }

        self.state.send_replace(SchedulerState::Running);
        let runner = self.build_runner(backup_dir, interval);
        if let Err(e) = runner.register_folders().await {
            tracing::error!(error = %e, "Failed to save folder registrations");
        }
        Ok((runner, interval))
    }

    fn build_runner(&self, backup_dir: PathBuf, interval: Duration) -> ScanRunner {
        let watch_dirs = self
            .config
            .watch_dirs
            .iter()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .collect();

        ScanRunner::new(
            Arc::clone(&self.store),
            Arc::clone(&self.fs),
            ChangeDetector::new(Arc::clone(&self.fs)),
            BackupCreator::new(
                Arc::clone(&self.store),
                Arc::clone(&self.archiver),
                Arc::clone(&self.fs),
                backup_dir.clone(),
            ),
            PurgePolicy::new(
                Arc::clone(&self.store),
                Arc::clone(&self.fs),
                backup_dir,
                interval,
            ),
            watch_dirs,
        )
    }
}
