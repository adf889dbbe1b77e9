//! Shared math and error types for the Skirmish crates.

pub mod bounds;
pub mod error;
pub mod transform;

pub use bounds::{Aabb, OrientedBox};
pub use error::{Result, SkirmishError};
pub use transform::Transform;

pub use glam;
