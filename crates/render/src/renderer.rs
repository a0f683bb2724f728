use crate::camera::PerspectiveCamera;
use std::fmt::Write;
use vista_scene::{Light, Scene};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state and a camera, then produces output. It
/// never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Human-readable dump of the scene and camera.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, lights={}, background={}) ===",
            scene.node_count(),
            scene.lights().len(),
            scene.background
        );
        let p = camera.position;
        let t = camera.target;
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} near={} far={}",
            p.x, p.y, p.z, t.x, t.y, t.z, camera.fov_degrees, camera.near, camera.far
        );

        for light in scene.lights() {
            match light {
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    let _ = writeln!(out, "  light hemisphere sky={sky} ground={ground} intensity={intensity}");
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                } => {
                    let _ = writeln!(
                        out,
                        "  light directional color={color} intensity={intensity} from=({:.1}, {:.1}, {:.1})",
                        position.x, position.y, position.z
                    );
                }
            }
        }

        for item in scene.draw_items() {
            let name = scene.get(item.id).map(|n| n.name.as_str()).unwrap_or("?");
            let pos = item.world.w_axis;
            let _ = writeln!(
                out,
                "  [{}] {name} pos=({:.2}, {:.2}, {:.2})",
                item.id.short(),
                pos.x,
                pos.y,
                pos.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use vista_assets::AssetStore;
    use vista_scene::{SceneConfig, build_scene};

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("nodes=0"));
        assert!(output.contains("background=#000000"));
        assert!(output.contains("fov=45"));
    }

    #[test]
    fn debug_renderer_demo_scene() {
        let mut store = AssetStore::new();
        let demo = build_scene(&SceneConfig::default(), &mut store).unwrap();
        let mut camera = PerspectiveCamera::default();
        camera.look_at(Vec3::new(0.0, 5.0, 0.0));
        let output = DebugTextRenderer::new().render(&demo.scene, &camera);

        assert!(output.contains("nodes=4"));
        assert!(output.contains("light hemisphere sky=#b1e1ff"));
        assert!(output.contains("light directional"));
        assert!(output.contains("sphere pos=(500.00, 500.00, 0.00)"));
        assert!(output.contains("target=(0.00, 5.00, 0.00)"));
    }
}
