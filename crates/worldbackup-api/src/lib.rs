//! # worldbackup-api
//!
//! HTTP API layer for World Backup built on Axum.
//!
//! Provides the REST endpoints over tracked folders, worlds, and backups,
//! middleware (CORS, request logging), path extractors, DTOs, error
//! mapping, optional static UI serving, and the server bootstrap that
//! starts the watch scheduler next to the HTTP listener.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, run_server_until, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
