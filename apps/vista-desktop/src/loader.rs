use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use vista_assets::{AssetError, LoadedModel, load_model};

/// Where the background model load stands, for the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    Disabled,
    Loading { obj: PathBuf },
    Loaded { name: String, meshes: usize, triangles: usize },
    Failed(String),
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Disabled => write!(f, "no model"),
            ModelStatus::Loading { obj } => write!(f, "loading {}", obj.display()),
            ModelStatus::Loaded {
                name,
                meshes,
                triangles,
            } => write!(f, "{name}: {meshes} meshes, {triangles} triangles"),
            ModelStatus::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// A model load running on a worker thread.
///
/// The MTL library is read first and handed to the OBJ parse, so material
/// names resolve against it.
pub struct ModelLoad {
    rx: Receiver<Result<LoadedModel, AssetError>>,
}

impl ModelLoad {
    pub fn spawn(mtl: &Path, obj: &Path) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mtl = mtl.to_path_buf();
        let obj = obj.to_path_buf();
        thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let result = load_model(&mtl, &obj);
                // Receiver gone means the viewer already quit.
                let _ = tx.send(result);
            })?;
        Ok(Self { rx })
    }

    /// Non-blocking check for the result. `None` while still loading.
    pub fn poll(&self) -> Option<Result<LoadedModel, String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.map_err(|e| e.to_string())),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err("model loader exited".into())),
        }
    }
}
