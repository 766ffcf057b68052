//! # worldbackup-core
//!
//! Core crate for World Backup. Contains the capability traits the watch
//! engine is built against (filesystem, archiver, clock, id generator),
//! configuration schemas, typed identifiers, duration parsing, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other World Backup crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
