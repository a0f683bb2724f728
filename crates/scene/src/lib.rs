//! Scene: node hierarchy, lights, configuration and demo scene assembly.
//!
//! # Invariants
//! - Every node id in a parent's child list refers to a live node.
//! - Subtree bounds are computed in world space from each renderable's
//!   local bounds and the node's world matrix.
//! - All scene mutations flow through explicit operations.

pub mod animation;
pub mod config;
pub mod light;
pub mod scene;
pub mod setup;

pub use animation::spin;
pub use config::SceneConfig;
pub use light::Light;
pub use scene::{DrawItem, Node, Renderable, Scene};
pub use setup::{DemoScene, attach_model, build_scene};

use std::path::PathBuf;
use vista_common::NodeId;

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("failed to read scene config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub fn crate_info() -> &'static str {
    "vista-scene v0.1.0"
}
