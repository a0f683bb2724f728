use crate::AssetError;
use crate::geometry::MeshData;
use crate::material::MaterialDesc;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use vista_common::Aabb;

/// A parsed MTL file, held in memory so an OBJ can be bound to it regardless
/// of the OBJ's own `mtllib` lines.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    source: PathBuf,
    raw: Vec<u8>,
    materials: Vec<MaterialDesc>,
}

impl MaterialLibrary {
    /// Read and parse an MTL file. Map paths are resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (parsed, _) = tobj::load_mtl_buf(&mut Cursor::new(raw.as_slice())).map_err(|e| {
            AssetError::MtlParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let base = path.parent().unwrap_or(Path::new("."));
        let materials = parsed
            .iter()
            .map(|m| {
                let mut desc = MaterialDesc::from_mtl(m);
                desc.texture = desc.texture.map(|t| t.resolved_against(base));
                desc
            })
            .collect::<Vec<_>>();

        tracing::info!(path = %path.display(), materials = materials.len(), "loaded material library");
        Ok(Self {
            source: path.to_path_buf(),
            raw,
            materials,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn materials(&self) -> &[MaterialDesc] {
        &self.materials
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// One mesh of a loaded model and the index of its material in
/// [`LoadedModel::materials`].
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub name: String,
    pub mesh: MeshData,
    pub material: Option<usize>,
}

/// Geometry and materials from one OBJ file.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub source: PathBuf,
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<MaterialDesc>,
}

impl LoadedModel {
    /// Local-space bounds of every mesh in the model.
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::empty(), |acc, m| acc.union(&m.mesh.bounds()))
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}

const PRELOADED_MTLLIB: &[u8] = b"mtllib preloaded.mtl\n";

/// Wavefront OBJ loader.
///
/// Faces are triangulated and re-indexed so position, normal and UV share one
/// index. With a preloaded [`MaterialLibrary`] materials are bound by name
/// against it; otherwise the OBJ's own `mtllib` is read next to the file.
#[derive(Debug, Clone)]
pub struct ObjLoader {
    library: Option<MaterialLibrary>,
}

impl Default for ObjLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjLoader {
    pub fn new() -> Self {
        Self { library: None }
    }

    pub fn with_materials(mut self, library: MaterialLibrary) -> Self {
        self.library = Some(library);
        self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedModel, AssetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        // A preloaded library is bound whether or not the OBJ names one, so
        // lead the stream with an `mtllib` line that resolves to it. Any
        // `mtllib` in the file resolves to the same library.
        let preamble: &[u8] = if self.library.is_some() {
            PRELOADED_MTLLIB
        } else {
            b""
        };
        let mut reader = Cursor::new(preamble).chain(reader);

        let (models, parsed_materials) =
            tobj::load_obj_buf(&mut reader, &options, |mtl_path| match &self.library {
                Some(lib) => tobj::load_mtl_buf(&mut Cursor::new(lib.raw.as_slice())),
                None => tobj::load_mtl(base.join(mtl_path)),
            })
            .map_err(|e| AssetError::ObjParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let parsed_materials = parsed_materials.unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "material library unavailable: {e}");
            Vec::new()
        });

        let (materials, remap) = match &self.library {
            Some(lib) => {
                // Rebind by name: parse order in the OBJ may differ from the library.
                let remap: HashMap<usize, usize> = parsed_materials
                    .iter()
                    .enumerate()
                    .filter_map(|(i, m)| lib.index_of(&m.name).map(|j| (i, j)))
                    .collect();
                (lib.materials.clone(), remap)
            }
            None => {
                let materials = parsed_materials
                    .iter()
                    .map(|m| {
                        let mut desc = MaterialDesc::from_mtl(m);
                        desc.texture = desc.texture.map(|t| t.resolved_against(&base));
                        desc
                    })
                    .collect::<Vec<_>>();
                let remap = (0..materials.len()).map(|i| (i, i)).collect();
                (materials, remap)
            }
        };

        let meshes: Vec<ModelMesh> = models
            .into_iter()
            .filter_map(|model| {
                let material = model
                    .mesh
                    .material_id
                    .and_then(|id| remap.get(&id).copied());
                convert_mesh(&model.mesh).map(|mesh| ModelMesh {
                    name: model.name,
                    mesh,
                    material,
                })
            })
            .collect();

        if meshes.is_empty() {
            return Err(AssetError::EmptyModel(path.to_path_buf()));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();
        let model = LoadedModel {
            name,
            source: path.to_path_buf(),
            meshes,
            materials,
        };
        tracing::info!(
            path = %path.display(),
            meshes = model.meshes.len(),
            vertices = model.vertex_count(),
            triangles = model.triangle_count(),
            "loaded model"
        );
        Ok(model)
    }
}

fn convert_mesh(mesh: &tobj::Mesh) -> Option<MeshData> {
    if mesh.positions.is_empty() || mesh.indices.is_empty() {
        return None;
    }
    let vertex_count = mesh.positions.len() / 3;
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let uvs = if mesh.texcoords.len() == vertex_count * 2 {
        mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
    } else {
        vec![[0.0, 0.0]; vertex_count]
    };
    let mut data = MeshData {
        positions,
        normals: Vec::new(),
        uvs,
        indices: mesh.indices.clone(),
    };
    if mesh.normals.len() == vertex_count * 3 {
        data.normals = mesh
            .normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect();
    } else {
        data.compute_vertex_normals();
    }
    Some(data)
}

/// Load a model in two stages: the material library first, then the
/// geometry bound to it. The first failing stage is returned.
pub fn load_model(mtl_path: &Path, obj_path: &Path) -> Result<LoadedModel, AssetError> {
    let _span = tracing::info_span!("load_model", obj = %obj_path.display()).entered();
    let library = MaterialLibrary::load(mtl_path)?;
    ObjLoader::new().with_materials(library).load(obj_path)
}
