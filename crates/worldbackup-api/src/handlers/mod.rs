//! Request handlers.

pub mod folder;
pub mod health;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unknown API routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError(worldbackup_core::AppError::not_found(format!(
        "No route for {}",
        uri.path()
    )))
}
