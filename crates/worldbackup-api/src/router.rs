//! Route definitions for the World Backup HTTP API.
//!
//! All API routes are mounted under `/api`. When a static root is
//! configured, every other path is served from it with `index.html` as the
//! fallback so client-side routing works.

use std::path::PathBuf;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get},
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and per-request middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(health_routes())
        .fallback(handlers::not_found);

    let mut router = Router::new().nest("/api", api_routes);

    let static_root = state.config.server.static_root.trim();
    if !static_root.is_empty() {
        let root = PathBuf::from(static_root);
        tracing::info!(root = %root.display(), "Serving static files");
        let index = ServeFile::new(root.join("index.html"));
        router = router.fallback_service(ServeDir::new(root).fallback(index));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Folder, world, and backup endpoints
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(handlers::folder::list_folders))
        .route("/folders/{id}/worlds", get(handlers::folder::list_worlds))
        .route(
            "/folders/{id}/worlds/{wid}",
            delete(handlers::folder::remove_world),
        )
        .route(
            "/folders/{id}/worlds/{wid}/backups/{bid}",
            delete(handlers::folder::delete_backup).patch(handlers::folder::restore_backup),
        )
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
