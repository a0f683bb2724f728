//! Rendering adapter: camera, framing, viewport and a renderer-agnostic
//! interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Camera state changes only through explicit operations; framing
//!   computes a pose and the caller applies it.

pub mod camera;
pub mod framing;
mod renderer;
pub mod viewport;

pub use camera::PerspectiveCamera;
pub use framing::{
    CameraPose, DEFAULT_FIT_MARGIN, FramingError, fit_distance, frame_area, frame_box,
    frame_box_with_margin,
};
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::Viewport;

pub fn crate_info() -> &'static str {
    "vista-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
