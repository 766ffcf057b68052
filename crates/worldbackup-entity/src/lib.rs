//! # worldbackup-entity
//!
//! The hierarchical records the watch engine maintains: a [`Folder`] owns
//! its [`World`]s and a world owns its [`Backup`]s. There are no
//! back-references; lookups are linear scans over the owning collection.
//!
//! Records carry no behavior beyond invariant-preserving mutation. Ids and
//! timestamps are always supplied by the caller so that the clock and id
//! source stay injectable.

pub mod backup;
pub mod folder;
pub mod world;

pub use backup::Backup;
pub use folder::{Folder, FolderListItem};
pub use world::World;
