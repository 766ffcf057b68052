//! # worldbackup-storage
//!
//! Concrete implementations of the filesystem and archive capabilities
//! declared in `worldbackup-core::traits`.

pub mod archiver;
pub mod providers;

pub use archiver::ZipArchiver;
pub use providers::local::LocalFileSystem;
