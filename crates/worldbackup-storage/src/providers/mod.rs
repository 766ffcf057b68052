//! Filesystem providers.

pub mod local;
