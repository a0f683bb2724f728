mod input_map;
mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use input_map::InputMap;
use loader::{ModelLoad, ModelStatus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};
use vista_assets::{AssetStore, LoadedModel};
use vista_common::NodeId;
use vista_input::{Action, OrbitControls};
use vista_render::{PerspectiveCamera, Viewport, frame_box_with_margin};
use vista_render_wgpu::WgpuRenderer;
use vista_scene::config::ModelConfig;
use vista_scene::{DemoScene, SceneConfig, attach_model, build_scene, spin};

#[derive(Parser)]
#[command(name = "vista-desktop", about = "Vista scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene description (YAML); built-in demo scene when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Material library to load the model with
    #[arg(long)]
    mtl: Option<PathBuf>,

    /// OBJ model to load
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Skip loading the model
    #[arg(long)]
    no_model: bool,
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if self.no_model {
            config.model = None;
        } else if self.mtl.is_some() || self.obj.is_some() {
            let model = config.model.get_or_insert_with(ModelConfig::default);
            if let Some(mtl) = &self.mtl {
                model.mtl = mtl.clone();
            }
            if let Some(obj) = &self.obj {
                model.obj = obj.clone();
            }
        }
        Ok(config)
    }
}

/// Viewer state that lives independently of the GPU.
struct AppState {
    demo: DemoScene,
    store: AssetStore,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    input: InputMap,
    model_config: Option<ModelConfig>,
    model_root: Option<NodeId>,
    model_status: ModelStatus,
    pending_load: Option<ModelLoad>,
    assets_dirty: bool,
    show_overlay: bool,
    started: Instant,
}

impl AppState {
    fn new(config: &SceneConfig) -> Result<Self> {
        let mut store = AssetStore::new();
        let demo = build_scene(config, &mut store)?;

        let mut camera = PerspectiveCamera::from_config(&config.camera);
        let mut controls = OrbitControls::new(config.camera.orbit_target);
        controls.update(&mut camera);

        Ok(Self {
            demo,
            store,
            camera,
            controls,
            viewport: Viewport::new(1, 1),
            input: InputMap::new(),
            model_config: config.model.clone(),
            model_root: None,
            model_status: ModelStatus::Disabled,
            pending_load: None,
            assets_dirty: true,
            show_overlay: true,
            started: Instant::now(),
        })
    }

    fn start_model_load(&mut self) -> Result<()> {
        let Some(model) = &self.model_config else {
            tracing::info!("model loading disabled");
            return Ok(());
        };
        tracing::info!(mtl = %model.mtl.display(), obj = %model.obj.display(), "loading model");
        self.pending_load =
            Some(ModelLoad::spawn(&model.mtl, &model.obj).context("spawn model loader")?);
        self.model_status = ModelStatus::Loading {
            obj: model.obj.clone(),
        };
        Ok(())
    }

    /// Pick up a finished model load, if any.
    fn poll_model(&mut self) {
        let Some(result) = self.pending_load.as_ref().and_then(ModelLoad::poll) else {
            return;
        };
        self.pending_load = None;
        match result {
            Ok(model) => self.add_model(&model),
            Err(message) => {
                tracing::error!("model load failed: {message}");
                self.model_status = ModelStatus::Failed(message);
            }
        }
    }

    fn add_model(&mut self, model: &LoadedModel) {
        match attach_model(&mut self.demo.scene, &mut self.store, model) {
            Ok(root) => {
                tracing::info!(
                    model = %model.name,
                    meshes = model.meshes.len(),
                    triangles = model.triangle_count(),
                    "model loaded"
                );
                self.model_root = Some(root);
                self.model_status = ModelStatus::Loaded {
                    name: model.name.clone(),
                    meshes: model.meshes.len(),
                    triangles: model.triangle_count(),
                };
                self.assets_dirty = true;
                self.frame_model();
            }
            Err(e) => {
                tracing::error!("failed to attach model: {e}");
                self.model_status = ModelStatus::Failed(e.to_string());
            }
        }
    }

    /// Point the camera at the model so it fills the view, and bound the
    /// orbit distance to its size.
    fn frame_model(&mut self) {
        let Some(root) = self.model_root else {
            return;
        };
        let (margin, factor) = self
            .model_config
            .as_ref()
            .map_or((1.2, 10.0), |m| (m.fit_margin, m.max_distance_factor));

        let bounds = match self.demo.scene.bounding_box(root) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("cannot frame model: {e}");
                return;
            }
        };
        match frame_box_with_margin(&bounds, &self.camera, margin) {
            Ok(pose) => {
                self.camera.apply_pose(&pose);
                let max_distance = bounds.diagonal() * factor;
                if max_distance > 0.0 {
                    self.controls.max_distance = max_distance;
                } else {
                    tracing::warn!(factor, "ignoring non-positive max_distance_factor");
                }
                self.controls.target = bounds.center();
                self.controls.update(&mut self.camera);
                tracing::info!(
                    distance = pose.distance(),
                    near = pose.near,
                    far = pose.far,
                    "camera framed model"
                );
            }
            Err(e) => tracing::warn!("cannot frame model: {e}"),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Reframe => self.frame_model(),
            Action::ToggleOverlay => self.show_overlay = !self.show_overlay,
            motion if motion.is_camera_motion() => {
                self.controls.handle(&motion);
            }
            _ => {}
        }
    }

    /// Per-frame update: resize check, spin, controls.
    /// Returns `true` when the drawing buffer changed size.
    fn update(&mut self, display: PhysicalSize<u32>) -> bool {
        self.poll_model();
        let resized = self
            .viewport
            .sync_camera(display.width, display.height, &mut self.camera);

        let time = self.started.elapsed().as_secs_f32();
        if let Err(e) = spin(&mut self.demo.scene, &self.demo.spinning, time) {
            tracing::warn!("spin failed: {e}");
        }
        self.controls.update(&mut self.camera);
        resized
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        egui::Window::new("Vista")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                let p = self.camera.position;
                ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                ui.label(format!(
                    "Near/Far: {:.3} / {:.1}",
                    self.camera.near, self.camera.far
                ));
                ui.label(format!("Nodes: {}", self.demo.scene.node_count()));
                ui.separator();
                ui.label(format!("Model: {}", self.model_status));
                if self.model_root.is_some() && ui.button("Frame model (F)").clicked() {
                    self.frame_model();
                }
                ui.separator();
                ui.small("LMB: Orbit | RMB: Pan | Wheel: Zoom | F1: Toggle overlay");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Vista")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("vista_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state
            .viewport
            .sync_camera(config.width, config.height, &mut self.state.camera);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            "GPU initialized"
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        self.state.start_model_load()
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let resized = self.state.update(window.inner_size());

        let (Some(surface), Some(device), Some(queue), Some(config), Some(renderer)) = (
            &self.surface,
            &self.device,
            &self.queue,
            &mut self.config,
            &mut self.renderer,
        ) else {
            return;
        };

        if resized {
            config.width = self.state.viewport.width;
            config.height = self.state.viewport.height;
            surface.configure(device, config);
            renderer.resize(device, config.width, config.height);
        }

        if self.state.assets_dirty {
            renderer.sync_assets(device, queue, &self.state.store);
            self.state.assets_dirty = false;
        }

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(device, queue, &view, &self.state.demo.scene, &self.state.camera);

        if let (Some(egui_winit), Some(egui_renderer)) =
            (&mut self.egui_winit, &mut self.egui_renderer)
        {
            let raw_input = egui_winit.take_egui_input(&window);
            let state = &mut self.state;
            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                state.draw_ui(ctx);
            });
            egui_winit.handle_platform_output(&window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [config.width, config.height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
            egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to start viewer: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                let action = self.state.input.key(key);
                self.state.apply(action);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.state
                    .input
                    .button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let action = self
                    .state
                    .input
                    .cursor_moved(position.x as f32, position.y as f32);
                self.state.apply(action);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.input.cursor_left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let action = self.state.input.wheel(delta);
                self.state.apply(action);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("vista-desktop starting");

    let config = cli.scene_config()?;
    let state = AppState::new(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::path::Path;
    use vista_assets::{ModelMesh, box_geometry};

    fn model() -> LoadedModel {
        LoadedModel {
            name: "tower".into(),
            source: PathBuf::from("tower.obj"),
            meshes: vec![ModelMesh {
                name: "body".into(),
                mesh: box_geometry(2.0, 4.0, 6.0),
                material: None,
            }],
            materials: vec![],
        }
    }

    fn state() -> AppState {
        let config = SceneConfig {
            model: None,
            ..SceneConfig::default()
        };
        AppState::new(&config).unwrap()
    }

    #[test]
    fn cli_overrides_model_paths() {
        let cli = Cli::parse_from(["vista-desktop", "--obj", "a.obj", "--mtl", "a.mtl"]);
        let model = cli.scene_config().unwrap().model.unwrap();
        assert_eq!(model.obj, Path::new("a.obj"));
        assert_eq!(model.mtl, Path::new("a.mtl"));

        let cli = Cli::parse_from(["vista-desktop", "--no-model"]);
        assert!(cli.scene_config().unwrap().model.is_none());
    }

    #[test]
    fn initial_camera_looks_at_orbit_target() {
        let state = state();
        assert_eq!(state.camera.target, Vec3::new(0.0, 5.0, 0.0));
        assert!(state.camera.position.abs_diff_eq(Vec3::new(0.0, 10.0, 20.0), 1e-3));
    }

    #[test]
    fn added_model_is_framed() {
        let mut state = state();
        state.add_model(&model());

        let diagonal = Vec3::new(2.0, 4.0, 6.0).length();
        assert_eq!(state.camera.near, diagonal / 100.0);
        assert_eq!(state.camera.far, diagonal * 100.0);
        assert_eq!(state.controls.target, Vec3::ZERO);
        assert_eq!(state.controls.max_distance, diagonal * 10.0);
        assert_eq!(state.camera.target, Vec3::ZERO);
        assert!(matches!(state.model_status, ModelStatus::Loaded { meshes: 1, .. }));
    }

    #[test]
    fn negative_distance_factor_keeps_orbit_unbounded() {
        let mut state = state();
        state.model_config = Some(ModelConfig {
            max_distance_factor: -1.0,
            ..ModelConfig::default()
        });
        state.add_model(&model());
        assert_eq!(state.controls.max_distance, f32::INFINITY);
        assert!(state.camera.position.is_finite());
        state.update(PhysicalSize::new(800, 400));
        assert!(state.camera.position.is_finite());
    }

    #[test]
    fn only_motion_actions_reach_controls() {
        let mut state = state();
        let size = PhysicalSize::new(800, 400);
        state.update(size);
        let start = state.camera.position;

        state.apply(Action::Noop);
        state.update(size);
        assert!(state.camera.position.abs_diff_eq(start, 1e-3));

        state.apply(Action::Orbit { dx: 80.0, dy: 0.0 });
        state.update(size);
        assert!(!state.camera.position.abs_diff_eq(start, 1e-3));
    }

    #[test]
    fn overlay_toggles() {
        let mut state = state();
        assert!(state.show_overlay);
        state.apply(Action::ToggleOverlay);
        assert!(!state.show_overlay);
    }
}
