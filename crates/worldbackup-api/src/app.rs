//! Application builder and server bootstrap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use worldbackup_core::config::AppConfig;
use worldbackup_core::error::{AppError, ErrorKind};
use worldbackup_core::traits::{Archiver, FileSystem, RandomIdGenerator, SystemClock};
use worldbackup_database::Store;
use worldbackup_service::FolderService;
use worldbackup_storage::{LocalFileSystem, ZipArchiver};
use worldbackup_worker::WatchScheduler;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state).layer(cors)
}

/// Runs the server until Ctrl-C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    run_server_until(config, shutdown_signal()).await
}

/// Runs the server until `shutdown` completes.
///
/// On shutdown the HTTP listener drains first, then the watch scheduler is
/// signalled and awaited for up to `shutdown_grace_seconds` (an in-flight
/// pass finishes), then the store is saved one last time.
pub async fn run_server_until<F>(config: AppConfig, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Starting World Backup v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Open the data store ─────────────────────────────
    let store = Arc::new(
        Store::open(
            &config.storage.data_file,
            Arc::new(SystemClock),
            Arc::new(RandomIdGenerator),
        )
        .await?,
    );

    // ── Step 2: Filesystem and archive adapters ─────────────────
    let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
    let archiver: Arc<dyn Archiver> = Arc::new(ZipArchiver::new());

    // ── Step 3: Shutdown channel ────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Start the watch scheduler ───────────────────────
    tracing::info!(
        dirs = ?config.watcher.watch_dirs,
        backup_dir = %config.watcher.backup_dir,
        interval = %config.watcher.check_interval,
        "Starting watch scheduler..."
    );
    let scheduler = WatchScheduler::new(
        config.watcher.clone(),
        Arc::clone(&store),
        Arc::clone(&fs),
        Arc::clone(&archiver),
    );
    let scheduler_state = scheduler.subscribe();
    let scheduler_handle = scheduler.start(shutdown_rx).await?;

    // ── Step 5: Initialize services ─────────────────────────────
    let folder_service = Arc::new(FolderService::new(
        Arc::clone(&store),
        fs,
        archiver,
        config.watcher.backup_path(),
    ));

    // ── Step 6: Build and start HTTP server ─────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(
        Arc::new(config),
        Arc::clone(&store),
        folder_service,
        scheduler_state,
    );
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!("World Backup listening on {}", addr);

    // ── Step 7: Graceful shutdown ───────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for the scheduler and flush the store ──────
    match tokio::time::timeout(grace, scheduler_handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Watch scheduler task failed: {}", e),
        Err(_) => tracing::warn!(
            "Watch scheduler did not stop within {}s, saving anyway",
            grace.as_secs()
        ),
    }
    store.close().await?;

    tracing::info!("World Backup shut down gracefully");
    Ok(())
}

/// Completes on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
