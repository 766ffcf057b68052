//! Integration tests for static web UI serving.

mod helpers;

use axum::http::StatusCode;

async fn app_with_ui() -> (tempfile::TempDir, helpers::TestApp) {
    let www = tempfile::tempdir().unwrap();
    helpers::write_file(&www.path().join("index.html"), "<h1>World Backup</h1>");
    helpers::write_file(&www.path().join("assets").join("app.js"), "console.log(1)");

    let root = www.path().display().to_string();
    let app = helpers::TestApp::with_config(|c| c.server.static_root = root).await;
    (www, app)
}

#[tokio::test]
async fn test_serves_static_files() {
    let (_www, app) = app_with_ui().await;

    let response = app.request("GET", "/assets/app.js").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "console.log(1)");
}

#[tokio::test]
async fn test_unknown_paths_fall_back_to_index() {
    let (_www, app) = app_with_ui().await;

    for path in ["/", "/folders/123/worlds"] {
        let response = app.request("GET", path).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.text, "<h1>World Backup</h1>", "{path}");
    }
}

#[tokio::test]
async fn test_api_routes_are_not_shadowed() {
    let (_www, app) = app_with_ui().await;

    let folders = app.request("GET", "/api/folders").await;
    assert_eq!(folders.status, StatusCode::OK);

    let missing = app.request("GET", "/api/missing").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "NOT_FOUND");
}
