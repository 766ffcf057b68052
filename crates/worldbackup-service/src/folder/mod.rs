//! Folder and world operations.

pub mod service;

pub use service::FolderService;
