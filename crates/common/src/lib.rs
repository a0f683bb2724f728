//! Shared value types used across the vista crates.
//!
//! Everything here is plain data: no crate in the workspace owns these, they
//! only pass them around.

pub mod bounds;
pub mod types;

pub use bounds::Aabb;
pub use types::{Color, ColorParseError, NodeId, Transform};
