use crate::AssetError;
use crate::geometry::MeshData;
use crate::material::MaterialDesc;
use crate::obj::LoadedModel;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed handle to a registered mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Content-addressed handle to a registered material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Content-addressed registry of meshes and materials.
///
/// Handles are derived from a SHA-256 of the content, so the same geometry
/// registered twice is stored once. The registry can be written to disk as
/// JSON for inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStore {
    meshes: BTreeMap<MeshHandle, MeshData>,
    materials: BTreeMap<MaterialHandle, MaterialDesc>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(mesh_hash(&mesh));
        self.meshes.entry(handle).or_insert(mesh);
        handle
    }

    pub fn register_material(&mut self, material: MaterialDesc) -> MaterialHandle {
        let handle = MaterialHandle(material_hash(&material));
        self.materials.entry(handle).or_insert(material);
        handle
    }

    /// Register every mesh of a model. Meshes without a material get the
    /// default material.
    pub fn register_model(&mut self, model: &LoadedModel) -> Vec<(MeshHandle, MaterialHandle)> {
        let material_handles: Vec<MaterialHandle> = model
            .materials
            .iter()
            .map(|m| self.register_material(m.clone()))
            .collect();
        let fallback = self.register_material(MaterialDesc::default());

        model
            .meshes
            .iter()
            .map(|m| {
                let mesh = self.register_mesh(m.mesh.clone());
                let material = m
                    .material
                    .and_then(|i| material_handles.get(i).copied())
                    .unwrap_or(fallback);
                (mesh, material)
            })
            .collect()
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.materials.get(&handle)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes.iter().map(|(h, m)| (*h, m))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &MaterialDesc)> {
        self.materials.iter().map(|(h, m)| (*h, m))
    }

    /// Number of registered assets of all kinds.
    pub fn len(&self) -> usize {
        self.meshes.len() + self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

fn digest_to_u64(hasher: Sha256) -> u64 {
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}

fn mesh_hash(mesh: &MeshData) -> u64 {
    let mut hasher = Sha256::new();
    for p in mesh.positions.iter().chain(&mesh.normals) {
        for c in p {
            hasher.update(c.to_le_bytes());
        }
    }
    for uv in &mesh.uvs {
        for c in uv {
            hasher.update(c.to_le_bytes());
        }
    }
    for i in &mesh.indices {
        hasher.update(i.to_le_bytes());
    }
    digest_to_u64(hasher)
}

fn material_hash(material: &MaterialDesc) -> u64 {
    let mut hasher = Sha256::new();
    // The JSON form covers every field, including the texture descriptor.
    match serde_json::to_vec(material) {
        Ok(bytes) => hasher.update(&bytes),
        Err(_) => hasher.update(material.name.as_bytes()),
    }
    digest_to_u64(hasher)
}
