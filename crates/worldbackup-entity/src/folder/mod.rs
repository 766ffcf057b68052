//! Folder domain entities.

pub mod model;

pub use model::{Folder, FolderListItem};
