//! Core type definitions used across the World Backup workspace.

pub mod duration;
pub mod id;

pub use duration::{DurationParseError, parse_duration};
pub use id::*;
