//! wgpu render backend for the scene viewer.
//!
//! Draws scene meshes with Phong or unlit materials, color maps, a
//! hemisphere light and a directional light.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Assets are uploaded once per handle; a missing texture degrades to
//!   white instead of failing the frame.
//! - Double-sided materials are drawn without back-face culling.

mod gpu;
mod mesh;
mod shaders;
mod texture;
mod uniforms;

pub use gpu::WgpuRenderer;
