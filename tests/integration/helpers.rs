//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use worldbackup_api::AppState;
use worldbackup_core::config::AppConfig;
use worldbackup_core::traits::{Archiver, FileSystem, ManualClock, SequentialIdGenerator};
use worldbackup_database::Store;
use worldbackup_service::FolderService;
use worldbackup_storage::{LocalFileSystem, ZipArchiver};
use worldbackup_worker::WatchScheduler;

/// Fixed start time for every test app.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Entity store for direct inspection
    pub store: Arc<Store>,
    /// Application config
    pub config: AppConfig,
    /// The watched directory
    pub saves: PathBuf,
    /// The backup directory
    pub backups: PathBuf,
    _scheduler: WatchScheduler,
    _dir: TempDir,
}

impl TestApp {
    /// Create a test app with one world, `Alpha`, backed up once.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`Self::new`], letting the caller adjust the config first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let saves = dir.path().join("saves");
        let backups = dir.path().join("backups");
        write_file(&saves.join("Alpha").join("level.dat"), "original");
        write_file(&saves.join("Alpha").join("region").join("r.0.0.mca"), "chunks");

        let mut config = AppConfig::default();
        config.watcher.watch_dirs = vec![saves.display().to_string()];
        config.watcher.backup_dir = backups.display().to_string();
        config.storage.data_file = dir.path().join("data.json").display().to_string();
        adjust(&mut config);

        let store = Arc::new(
            Store::open(
                &config.storage.data_file,
                Arc::new(ManualClock::new(t0())),
                Arc::new(SequentialIdGenerator::new()),
            )
            .await
            .expect("Failed to open store"),
        );

        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
        let archiver: Arc<dyn Archiver> = Arc::new(ZipArchiver::new());

        let scheduler = WatchScheduler::new(
            config.watcher.clone(),
            Arc::clone(&store),
            Arc::clone(&fs),
            Arc::clone(&archiver),
        );
        scheduler.run_once().await.expect("Initial scan failed");

        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&store),
            fs,
            archiver,
            config.watcher.backup_path(),
        ));

        let state = AppState::new(
            Arc::new(config.clone()),
            Arc::clone(&store),
            folder_service,
            scheduler.subscribe(),
        );
        let router = worldbackup_api::build_app(state);

        Self {
            router,
            store,
            config,
            saves,
            backups,
            _scheduler: scheduler,
            _dir: dir,
        }
    }

    /// Id of the single watched folder.
    pub async fn folder_id(&self) -> String {
        self.store.read().await.folders[0].id.to_string()
    }

    /// Ids of the `Alpha` world and its newest backup.
    pub async fn alpha(&self) -> (String, String, String) {
        let db = self.store.read().await;
        let folder = &db.folders[0];
        let world = folder.world_by_name("Alpha").expect("Alpha tracked");
        let backup = world.last_backup().expect("Alpha backed up");
        (folder.id.to_string(), world.id.to_string(), backup.id.to_string())
    }

    /// Path of the archive for the newest `Alpha` backup.
    pub async fn alpha_archive(&self) -> PathBuf {
        let db = self.store.read().await;
        let world = db.folders[0].world_by_name("Alpha").expect("Alpha tracked");
        self.backups
            .join(&world.last_backup().expect("Alpha backed up").name)
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
    /// Raw body
    pub text: String,
}

impl TestResponse {
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        assert_eq!(self.body["success"], true, "not a success body: {}", self.text);
        &self.body["data"]
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create dir");
    }
    std::fs::write(path, contents).expect("Failed to write file");
}
