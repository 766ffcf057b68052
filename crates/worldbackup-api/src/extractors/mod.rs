//! Request extractors.

pub mod path;
