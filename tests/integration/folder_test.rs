//! Integration tests for folder, world, and backup endpoints.

mod helpers;

use axum::http::StatusCode;

use helpers::{TestApp, t0, write_file};

#[tokio::test]
async fn test_list_folders() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/folders").await;

    assert_eq!(response.status, StatusCode::OK);
    let folders = response.data().as_array().expect("array of folders");
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["id"], app.folder_id().await);
    assert_eq!(folders[0]["path"], app.saves.display().to_string());
    assert_eq!(folders[0]["numberOfWorlds"], 1);
    assert!(folders[0]["lastRun"].is_string());
    assert!(folders[0].get("worlds").is_none());
}

#[tokio::test]
async fn test_list_worlds_includes_backups() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;

    let response = app
        .request("GET", &format!("/api/folders/{folder}/worlds"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let worlds = response.data().as_array().expect("array of worlds");
    assert_eq!(worlds.len(), 1);
    assert_eq!(worlds[0]["id"], world);
    assert_eq!(worlds[0]["name"], "Alpha");
    assert_eq!(
        worlds[0]["fullPath"],
        app.saves.join("Alpha").display().to_string()
    );
    assert_eq!(worlds[0]["backups"][0]["id"], backup);
    let name = worlds[0]["backups"][0]["name"].as_str().unwrap();
    assert!(name.starts_with(&format!("Alpha-{world}-")));
    assert!(name.ends_with("20240601T120000.zip"));
    assert!(app.backups.join(name).is_file());
}

#[tokio::test]
async fn test_unknown_folder_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/folders/00000000-0000-0000-0000-999999999999/worlds",
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/folders/not-a-uuid/worlds").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_api_route_is_json_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/nothing/here").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_backup_removes_archive_and_record() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    let archive = app.alpha_archive().await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], world);
    assert_eq!(response.data()["backups"].as_array().unwrap().len(), 0);
    assert!(!archive.exists());

    let saved = std::fs::read_to_string(&app.config.storage.data_file).unwrap();
    assert!(!saved.contains(&backup));
}

#[tokio::test]
async fn test_delete_backup_with_missing_archive_still_drops_record() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    std::fs::remove_file(app.alpha_archive().await).unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let db = app.store.read().await;
    assert!(db.folders[0].worlds[0].backups.is_empty());
}

#[tokio::test]
async fn test_failed_archive_delete_is_server_error_and_keeps_record() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    let archive = app.alpha_archive().await;
    std::fs::remove_file(&archive).unwrap();
    write_file(&archive.join("keep"), "x");

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "INTERNAL_ERROR");
    assert_eq!(app.store.read().await.folders[0].worlds[0].backups.len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_backup_is_not_found() {
    let app = TestApp::new().await;
    let (folder, world, _) = app.alpha().await;

    let response = app
        .request(
            "DELETE",
            &format!(
                "/api/folders/{folder}/worlds/{world}/backups/00000000-0000-0000-0000-999999999999"
            ),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.read().await.folders[0].worlds[0].backups.len(), 1);
}

#[tokio::test]
async fn test_restore_moves_current_world_aside() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    write_file(&app.saves.join("Alpha").join("level.dat"), "changed");

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Alpha");

    let restored = std::fs::read_to_string(app.saves.join("Alpha").join("level.dat")).unwrap();
    assert_eq!(restored, "original");
    let region =
        std::fs::read_to_string(app.saves.join("Alpha").join("region").join("r.0.0.mca")).unwrap();
    assert_eq!(region, "chunks");

    let aside = app.saves.join(format!("Alpha_{}", t0().timestamp()));
    let moved = std::fs::read_to_string(aside.join("level.dat")).unwrap();
    assert_eq!(moved, "changed");

    // Restoring does not touch the entity graph.
    assert_eq!(app.store.read().await.folders[0].worlds.len(), 1);
}

#[tokio::test]
async fn test_restore_without_world_directory() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    std::fs::remove_dir_all(app.saves.join("Alpha")).unwrap();

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(app.saves.join("Alpha").join("level.dat").is_file());
}

#[tokio::test]
async fn test_restore_with_missing_archive_is_not_found() {
    let app = TestApp::new().await;
    let (folder, world, backup) = app.alpha().await;
    std::fs::remove_file(app.alpha_archive().await).unwrap();

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{folder}/worlds/{world}/backups/{backup}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let current = std::fs::read_to_string(app.saves.join("Alpha").join("level.dat")).unwrap();
    assert_eq!(current, "original");
}

#[tokio::test]
async fn test_remove_world_deletes_directory_and_record() {
    let app = TestApp::new().await;
    let (folder, world, _) = app.alpha().await;
    let archive = app.alpha_archive().await;

    let response = app
        .request("DELETE", &format!("/api/folders/{folder}/worlds/{world}"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], world);
    assert!(!app.saves.join("Alpha").exists());
    // Backups outlive the world.
    assert!(archive.is_file());

    let worlds = app
        .request("GET", &format!("/api/folders/{folder}/worlds"))
        .await;
    assert_eq!(worlds.data().as_array().unwrap().len(), 0);

    let again = app
        .request("DELETE", &format!("/api/folders/{folder}/worlds/{world}"))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
