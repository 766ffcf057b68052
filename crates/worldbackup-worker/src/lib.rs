//! Poll-based world backup engine.
//!
//! This crate provides:
//! - A change detector comparing world file mtimes to the last backup
//! - A backup creator that names, archives, and records one backup
//! - A purge policy dropping near-duplicate backups
//! - A scan runner performing one full pass over every watched folder
//! - A watch scheduler repeating passes on an interval until stopped

pub mod jobs;
pub mod runner;
pub mod scheduler;

#[cfg(test)]
mod fakes;

pub use jobs::{BackupCreator, ChangeDetector, PurgePolicy};
pub use runner::{ScanReport, ScanRunner};
pub use scheduler::{SchedulerState, WatchScheduler, validate};
