//! # worldbackup-service
//!
//! Use cases behind the REST API: listing tracked folders and worlds,
//! deleting a backup, restoring a world from a backup, and removing a
//! world.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod folder;

pub use folder::FolderService;
