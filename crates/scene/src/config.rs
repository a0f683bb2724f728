//! Scene configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock demo scene, and a partial file overrides only what it names.

use crate::SceneError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vista_common::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: Color,
    pub camera: CameraConfig,
    pub primitives: PrimitivesConfig,
    pub ground: GroundConfig,
    pub hemisphere_light: HemisphereLightConfig,
    pub directional_light: DirectionalLightConfig,
    /// `None` skips model loading entirely.
    pub model: Option<ModelConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            camera: CameraConfig::default(),
            primitives: PrimitivesConfig::default(),
            ground: GroundConfig::default(),
            hemisphere_light: HemisphereLightConfig::default(),
            directional_light: DirectionalLightConfig::default(),
            model: Some(ModelConfig::default()),
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, SceneError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Initial camera and orbit-control state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub orbit_target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 2.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 10.0, 20.0),
            orbit_target: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

/// The three primitive shapes: a lit cube, a lit sphere, a textured cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitivesConfig {
    pub box_size: Vec3,
    pub color: Color,
    pub cube_position: Vec3,
    pub sphere_radius: f32,
    pub sphere_width_segments: u32,
    pub sphere_height_segments: u32,
    pub sphere_position: Vec3,
    pub textured_cube_position: Vec3,
    pub textured_cube_texture: PathBuf,
}

impl Default for PrimitivesConfig {
    fn default() -> Self {
        Self {
            box_size: Vec3::splat(100.0),
            color: Color::from_hex(0x44aa88),
            cube_position: Vec3::new(1000.0, 500.0, 0.0),
            sphere_radius: 50.0,
            sphere_width_segments: 32,
            sphere_height_segments: 32,
            sphere_position: Vec3::new(500.0, 500.0, 0.0),
            textured_cube_position: Vec3::new(-1000.0, 500.0, 0.0),
            textured_cube_texture: PathBuf::from("assets/images/wall.png"),
        }
    }
}

/// Checker-textured ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub size: f32,
    /// World-space size of one texture repeat.
    pub tile_size: f32,
    pub texture: PathBuf,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 4000.0,
            tile_size: 200.0,
            texture: PathBuf::from("assets/images/checker.png"),
        }
    }
}

impl GroundConfig {
    pub fn repeats(&self) -> f32 {
        if self.tile_size > 0.0 {
            self.size / self.tile_size
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereLightConfig {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

impl Default for HemisphereLightConfig {
    fn default() -> Self {
        Self {
            sky: Color::from_hex(0xb1e1ff),
            ground: Color::from_hex(0xb97a20),
            intensity: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 3.0,
            position: Vec3::new(5.0, 10.0, 2.0),
            target: Vec3::ZERO,
        }
    }
}

/// External model and how the camera frames it once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub mtl: PathBuf,
    pub obj: PathBuf,
    /// On-screen size as a multiple of the model's box diagonal.
    pub fit_margin: f32,
    /// Orbit max distance as a multiple of the box diagonal.
    pub max_distance_factor: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mtl: PathBuf::from("assets/models/windmill_2/windmill-fixed.mtl"),
            obj: PathBuf::from("assets/models/windmill_2/windmill.obj"),
            fit_margin: 1.2,
            max_distance_factor: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_scene() {
        let c = SceneConfig::default();
        assert_eq!(c.camera.fov_degrees, 45.0);
        assert_eq!(c.camera.position, Vec3::new(0.0, 10.0, 20.0));
        assert_eq!(c.primitives.color.to_hex(), 0x44aa88);
        assert_eq!(c.ground.repeats(), 20.0);
        assert_eq!(c.hemisphere_light.sky.to_hex(), 0xb1e1ff);
        assert_eq!(c.directional_light.position, Vec3::new(5.0, 10.0, 2.0));
        assert_eq!(c.model.as_ref().unwrap().fit_margin, 1.2);
    }

    #[test]
    fn yaml_roundtrip() {
        let c = SceneConfig::default();
        let text = c.to_yaml().unwrap();
        let back = SceneConfig::from_yaml(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let text = "\
background: '#202020'
camera:
  fov_degrees: 60
ground:
  size: 1000
";
        let c = SceneConfig::from_yaml(text).unwrap();
        assert_eq!(c.background.to_hex(), 0x202020);
        assert_eq!(c.camera.fov_degrees, 60.0);
        assert_eq!(c.camera.near, 0.1);
        assert_eq!(c.ground.size, 1000.0);
        assert_eq!(c.ground.tile_size, 200.0);
        assert!(c.model.is_some());
    }

    #[test]
    fn empty_text_is_default() {
        assert_eq!(SceneConfig::from_yaml("  \n").unwrap(), SceneConfig::default());
    }

    #[test]
    fn null_model_disables_loading() {
        let c = SceneConfig::from_yaml("model: null\n").unwrap();
        assert!(c.model.is_none());
    }

    #[test]
    fn bad_color_is_parse_error() {
        let err = SceneConfig::from_yaml("background: 'mauve'\n").unwrap_err();
        assert!(matches!(err, SceneError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, "primitives:\n  sphere_radius: 10\n").unwrap();
        let c = SceneConfig::load(&path).unwrap();
        assert_eq!(c.primitives.sphere_radius, 10.0);

        let err = SceneConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, SceneError::ConfigRead { .. }));
    }
}
