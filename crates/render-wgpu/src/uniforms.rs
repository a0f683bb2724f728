use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use vista_assets::{MaterialDesc, MaterialKind};
use vista_render::PerspectiveCamera;
use vista_scene::{Light, Scene};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
}

impl FrameUniforms {
    /// Collect camera and light state. The first hemisphere light and the
    /// first directional light are used; missing lights contribute nothing.
    pub fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let mut uniforms = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            sky_color: [0.0; 4],
            ground_color: [0.0; 4],
            light_dir: [0.0, 1.0, 0.0, 0.0],
            light_color: [0.0; 4],
        };
        let mut have_hemi = false;
        let mut have_dir = false;
        for light in scene.lights() {
            match light {
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } if !have_hemi => {
                    uniforms.sky_color = sky.to_linear_scaled(*intensity);
                    uniforms.ground_color = ground.to_linear_scaled(*intensity);
                    have_hemi = true;
                }
                Light::Directional {
                    color, intensity, ..
                } if !have_dir => {
                    if let Some(dir) = light.direction_to_light() {
                        uniforms.light_dir = dir.extend(0.0).to_array();
                        uniforms.light_color = color.to_linear_scaled(*intensity);
                        have_dir = true;
                    }
                }
                _ => {}
            }
        }
        uniforms
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Linear specular color in xyz, shininess in w.
    pub specular: [f32; 4],
    /// UV repeat in xy, unlit flag in z.
    pub params: [f32; 4],
}

impl DrawUniforms {
    pub fn new(world: Mat4, material: &MaterialDesc) -> Self {
        let [r, g, b] = material.color.to_linear();
        let [sr, sg, sb] = material.specular.to_linear();
        let repeat = material.texture.as_ref().map_or([1.0, 1.0], |t| t.repeat);
        let unlit = match material.kind {
            MaterialKind::Basic => 1.0,
            MaterialKind::Phong => 0.0,
        };
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, material.opacity],
            specular: [sr, sg, sb, material.shininess],
            params: [repeat[0], repeat[1], unlit, 0.0],
        }
    }
}
