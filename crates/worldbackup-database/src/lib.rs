//! # worldbackup-database
//!
//! Persistence for the folder/world/backup graph. The whole graph is one
//! [`Database`] document held in memory by a [`Store`], guarded by a single
//! lock and written to a JSON file on every save.

pub mod document;
pub mod store;

pub use document::Database;
pub use store::Store;
