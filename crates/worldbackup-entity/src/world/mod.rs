//! World domain entities.

pub mod model;

pub use model::World;
