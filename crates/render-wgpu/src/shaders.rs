/// WGSL shader for scene meshes.
///
/// Group 0 holds per-frame camera and light data. Group 1 holds per-draw
/// transforms, material parameters, the color map and its sampler.
/// `params.z` selects the unlit path; `params.xy` is the UV repeat.
pub const MESH_SHADER: &str = r#"
const RECIPROCAL_PI: f32 = 0.3183098861837907;

struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    sky_color: vec4<f32>,
    ground_color: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

struct Draw {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    specular: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> draw: Draw;
@group(1) @binding(1)
var color_map: texture_2d<f32>;
@group(1) @binding(2)
var color_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = draw.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (draw.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv * draw.params.xy;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    // Image rows run top-down while v runs bottom-up.
    let texel = textureSample(color_map, color_sampler, vec2<f32>(in.uv.x, 1.0 - in.uv.y));
    let base = draw.color * texel;

    if (draw.params.z > 0.5) {
        return base;
    }

    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }

    let hemi = mix(frame.ground_color.rgb, frame.sky_color.rgb, 0.5 * n.y + 0.5);

    let l = normalize(frame.light_dir.xyz);
    let n_dot_l = max(dot(n, l), 0.0);
    let direct = frame.light_color.rgb * n_dot_l;

    let v = normalize(frame.camera_pos.xyz - in.world_pos);
    let h = normalize(l + v);
    let shininess = draw.specular.w;
    let blinn = RECIPROCAL_PI * (shininess * 0.5 + 1.0) * pow(max(dot(n, h), 0.0), shininess);
    let spec = draw.specular.rgb * blinn * direct;

    let diffuse = base.rgb * RECIPROCAL_PI * (hemi + direct);
    return vec4<f32>(diffuse + spec, base.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::{DrawUniforms, FrameUniforms};
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    fn module() -> naga::Module {
        naga::front::wgsl::parse_str(MESH_SHADER)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(MESH_SHADER)))
    }

    fn struct_size(module: &naga::Module, name: &str) -> u32 {
        module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(n), naga::TypeInner::Struct { span, .. }) if n == name => Some(*span),
                _ => None,
            })
            .unwrap_or_else(|| panic!("struct {name} missing"))
    }

    #[test]
    fn shader_parses_and_validates() {
        let module = module();
        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .unwrap();
    }

    #[test]
    fn entry_points_present() {
        let module = module();
        let names: Vec<_> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn uniform_layouts_match_host_structs() {
        let module = module();
        assert_eq!(
            struct_size(&module, "Frame") as usize,
            std::mem::size_of::<FrameUniforms>()
        );
        assert_eq!(
            struct_size(&module, "Draw") as usize,
            std::mem::size_of::<DrawUniforms>()
        );
    }

    #[test]
    fn texture_v_is_flipped() {
        assert!(MESH_SHADER.contains("1.0 - in.uv.y"));
    }
}
