//! Typed path parameter helpers.

use std::str::FromStr;

use worldbackup_core::error::AppError;
use worldbackup_core::types::{BackupId, FolderId, WorldId};

fn parse<T: FromStr>(s: &str, what: &str) -> Result<T, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid {what} id: {s}")))
}

/// Parses a folder id from a path segment.
pub fn folder_id(s: &str) -> Result<FolderId, AppError> {
    parse(s, "folder")
}

/// Parses a world id from a path segment.
pub fn world_id(s: &str) -> Result<WorldId, AppError> {
    parse(s, "world")
}

/// Parses a backup id from a path segment.
pub fn backup_id(s: &str) -> Result<BackupId, AppError> {
    parse(s, "backup")
}
