//! End-to-end server lifecycle: first pass, serve, graceful shutdown.

use std::time::Duration;

use serde_json::Value;

use worldbackup_core::config::AppConfig;
use worldbackup_core::error::ErrorKind;

fn config_in(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.shutdown_grace_seconds = 5;
    config.watcher.watch_dirs = vec![dir.join("saves").display().to_string()];
    config.watcher.backup_dir = dir.join("backups").display().to_string();
    config.storage.data_file = dir.join("data.json").display().to_string();
    config
}

#[tokio::test]
async fn test_first_pass_runs_and_store_is_saved_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let world = dir.path().join("saves").join("Alpha");
    std::fs::create_dir_all(&world).unwrap();
    std::fs::write(world.join("level.dat"), "data").unwrap();

    worldbackup_api::run_server_until(
        config_in(dir.path()),
        tokio::time::sleep(Duration::from_millis(200)),
    )
    .await
    .expect("server runs and shuts down");

    let archives: Vec<_> = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(archives.len(), 1);
    assert!(archives[0].starts_with("Alpha-"));

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("data.json")).unwrap())
            .unwrap();
    let folders = saved["folders"].as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert!(folders[0]["lastRun"].is_string());
    assert_eq!(folders[0]["worlds"][0]["name"], "Alpha");
    assert_eq!(folders[0]["worlds"][0]["backups"][0]["name"], archives[0]);
}

#[tokio::test]
async fn test_invalid_watcher_config_fails_before_serving() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.watcher.watch_dirs.clear();

    let err = worldbackup_api::run_server_until(config, std::future::pending::<()>())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Configuration);
}
