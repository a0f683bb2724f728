//! Asset pipeline: procedural geometry, texture decoding, MTL/OBJ loading and
//! a content-addressed registry.
//!
//! Assets are identified by content-derived handles. The renderer consumes
//! assets by handle, never by raw file paths.
//!
//! # Invariants
//! - Registering identical content twice yields the same handle.
//! - Model loading is a linear pipeline: material library, then geometry.
//!   A failed stage stops the chain and reports why.

mod geometry;
mod material;
mod obj;
mod store;
mod texture;

pub use geometry::{MeshData, box_geometry, plane_geometry, sphere_geometry};
pub use material::{MaterialDesc, MaterialKind};
pub use obj::{LoadedModel, MaterialLibrary, ModelMesh, ObjLoader, load_model};
pub use store::{AssetStore, MaterialHandle, MeshHandle};
pub use texture::{ColorSpace, MagFilter, TextureData, TextureDesc, WrapMode, load_texture};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("MTL parse error in {path}: {message}")]
    MtlParse { path: PathBuf, message: String },
    #[error("OBJ parse error in {path}: {message}")]
    ObjParse { path: PathBuf, message: String },
    #[error("model {0} contains no geometry")]
    EmptyModel(PathBuf),
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn crate_info() -> &'static str {
    "vista-assets v0.1.0"
}
