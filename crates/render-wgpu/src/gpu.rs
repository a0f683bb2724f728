use crate::mesh::{GpuMesh, Vertex};
use crate::shaders;
use crate::texture;
use crate::uniforms::{DrawUniforms, FrameUniforms};
use std::collections::BTreeMap;
use vista_assets::{AssetStore, MaterialDesc, MaterialHandle, MeshHandle};
use vista_common::{Color, NodeId};
use vista_render::PerspectiveCamera;
use vista_scene::Scene;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Texture view, sampler and a copy of the material parameters.
struct GpuMaterial {
    desc: MaterialDesc,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

/// Per-node uniform buffer and bind group.
struct DrawSlot {
    material: MaterialHandle,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    materials: BTreeMap<MaterialHandle, GpuMaterial>,
    slots: BTreeMap<NodeId, DrawSlot>,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::new(
                &Scene::new(),
                &PerspectiveCamera::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let make_pipeline = |label: &str, cull_mode: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipeline = make_pipeline("mesh_pipeline", Some(wgpu::Face::Back));
        let double_sided_pipeline = make_pipeline("mesh_pipeline_double_sided", None);

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            double_sided_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            meshes: BTreeMap::new(),
            materials: BTreeMap::new(),
            slots: BTreeMap::new(),
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Upload every mesh and material in `store` that isn't resident yet.
    /// Textures that fail to load are replaced by white.
    pub fn sync_assets(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, store: &AssetStore) {
        let mut uploaded_meshes = 0usize;
        for (handle, mesh) in store.meshes() {
            if self.meshes.contains_key(&handle) || mesh.is_empty() {
                continue;
            }
            let label = format!("mesh_{}", handle.0);
            self.meshes.insert(handle, GpuMesh::upload(device, &label, mesh));
            uploaded_meshes += 1;
        }

        let mut uploaded_materials = 0usize;
        for (handle, desc) in store.materials() {
            if self.materials.contains_key(&handle) {
                continue;
            }
            let tex = desc.texture.as_ref();
            let data = texture::texture_or_white(tex);
            let color_space = tex.map(|t| t.color_space).unwrap_or_default();
            let view = texture::upload(device, queue, &data, color_space);
            let sampler = device.create_sampler(&texture::sampler_descriptor(tex));
            self.materials.insert(
                handle,
                GpuMaterial {
                    desc: desc.clone(),
                    view,
                    sampler,
                },
            );
            uploaded_materials += 1;
        }

        if uploaded_meshes + uploaded_materials > 0 {
            tracing::debug!(
                meshes = uploaded_meshes,
                materials = uploaded_materials,
                "uploaded assets"
            );
        }
    }

    fn slot_for(
        &mut self,
        device: &wgpu::Device,
        id: NodeId,
        material: MaterialHandle,
    ) -> Option<&DrawSlot> {
        let stale = self.slots.get(&id).is_some_and(|s| s.material != material);
        if stale || !self.slots.contains_key(&id) {
            let gpu_material = self.materials.get(&material)?;
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("draw_uniforms"),
                size: std::mem::size_of::<DrawUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("draw_bind_group"),
                layout: &self.draw_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&gpu_material.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&gpu_material.sampler),
                    },
                ],
            });
            self.slots.insert(
                id,
                DrawSlot {
                    material,
                    buffer,
                    bind_group,
                },
            );
        }
        self.slots.get(&id)
    }

    /// Render one frame of `scene` from `camera`, clearing to the scene
    /// background.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(scene, camera)),
        );

        let items = scene.draw_items();
        self.slots
            .retain(|id, _| items.iter().any(|item| item.id == *id));

        // (mesh, node, double sided)
        let mut draws: Vec<(MeshHandle, NodeId, bool)> = Vec::with_capacity(items.len());
        for item in &items {
            let r = item.renderable;
            if !self.meshes.contains_key(&r.mesh) {
                continue;
            }
            let Some(desc) = self.materials.get(&r.material).map(|m| m.desc.clone()) else {
                continue;
            };
            let Some(slot) = self.slot_for(device, item.id, r.material) else {
                continue;
            };
            queue.write_buffer(
                &slot.buffer,
                0,
                bytemuck::bytes_of(&DrawUniforms::new(item.world, &desc)),
            );
            draws.push((r.mesh, item.id, desc.double_sided));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (mesh_handle, id, double_sided) in &draws {
                let (Some(mesh), Some(slot)) = (self.meshes.get(mesh_handle), self.slots.get(id))
                else {
                    continue;
                };
                pass.set_pipeline(if *double_sided {
                    &self.double_sided_pipeline
                } else {
                    &self.pipeline
                });
                pass.set_bind_group(1, &slot.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// Background color in linear space, as the surface expects.
pub(crate) fn clear_color(background: Color) -> wgpu::Color {
    let [r, g, b] = background.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
