//! Per-world steps of a scan pass.

pub mod backup;
pub mod detect;
pub mod purge;

pub use backup::{BackupCreator, backup_name};
pub use detect::ChangeDetector;
pub use purge::{PURGE_GRACE, PurgePolicy};
