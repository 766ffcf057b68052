//! Integration tests for the health endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_reports_status_and_counts() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["status"], "ok");
    assert_eq!(data["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(data["folders"], 1);
    assert!(data["scheduler"].is_string());
    assert!(data["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_root_without_static_root_is_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
