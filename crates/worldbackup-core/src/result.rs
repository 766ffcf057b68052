//! Convenience result type alias for World Backup.

use crate::error::AppError;

/// A specialized `Result` type for World Backup operations.
pub type AppResult<T> = Result<T, AppError>;
