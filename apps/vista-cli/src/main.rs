use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vista_assets::{AssetStore, load_model};
use vista_render::{
    CameraPose, DebugTextRenderer, PerspectiveCamera, Renderer, frame_area, frame_box,
};
use vista_scene::{SceneConfig, build_scene};

#[derive(Parser)]
#[command(name = "vista-cli", about = "CLI tool for vista operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compute the camera pose that frames a box
    Frame {
        /// Diagonal of the box being framed
        #[arg(long)]
        box_size: f32,
        /// World-space height that should fill the view
        #[arg(long)]
        size_to_fit: f32,
        /// Vertical field of view in degrees
        #[arg(long, default_value = "45")]
        fov: f32,
        /// Current camera position as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        camera: Vec3,
        /// Box center as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        center: Vec3,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Load an OBJ/MTL pair and report its bounds and framing
    Inspect {
        #[arg(long)]
        mtl: PathBuf,
        #[arg(long)]
        obj: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Build the scene and print a text rendering of it
    Describe {
        /// Scene description (YAML); built-in demo scene when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{s}'"));
    };
    let num = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("invalid component '{v}': {e}"))
    };
    Ok(Vec3::new(num(*x)?, num(*y)?, num(*z)?))
}

fn format_pose(pose: &CameraPose) -> String {
    let p = pose.position;
    let t = pose.target;
    format!(
        "position=({:.4}, {:.4}, {:.4}) target=({:.4}, {:.4}, {:.4}) distance={:.4} near={} far={}",
        p.x,
        p.y,
        p.z,
        t.x,
        t.y,
        t.z,
        pose.distance(),
        pose.near,
        pose.far
    )
}

fn info() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "vista-cli v{}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "assets: {}", vista_assets::crate_info());
    let _ = writeln!(out, "scene: {}", vista_scene::crate_info());
    let _ = writeln!(out, "render: {}", vista_render::crate_info());
    let _ = writeln!(out, "input: {}", vista_input::crate_info());
    out
}

fn frame(
    box_size: f32,
    size_to_fit: f32,
    fov: f32,
    camera: Vec3,
    center: Vec3,
    json: bool,
) -> Result<String> {
    let mut cam = PerspectiveCamera::new(fov, 2.0, 0.1, 100.0);
    cam.position = camera;
    let pose = frame_area(size_to_fit, box_size, center, &cam)?;
    if json {
        Ok(serde_json::to_string_pretty(&pose)?)
    } else {
        Ok(format_pose(&pose))
    }
}

fn inspect(mtl: &Path, obj: &Path, json: bool) -> Result<String> {
    let model = load_model(mtl, obj)
        .with_context(|| format!("loading {} with {}", obj.display(), mtl.display()))?;
    let bounds = model.bounds();
    let pose = frame_box(&bounds, &PerspectiveCamera::default())?;

    if json {
        let meshes: Vec<_> = model
            .meshes
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.name,
                    "vertices": m.mesh.vertex_count(),
                    "triangles": m.mesh.triangle_count(),
                    "material": m.material.and_then(|i| model.materials.get(i)).map(|mat| &mat.name),
                })
            })
            .collect();
        let value = serde_json::json!({
            "name": model.name,
            "meshes": meshes,
            "materials": model.materials.iter().map(|m| &m.name).collect::<Vec<_>>(),
            "bounds": { "min": bounds.min, "max": bounds.max },
            "center": bounds.center(),
            "diagonal": bounds.diagonal(),
            "pose": pose,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "model {} ({} meshes, {} materials, {} vertices, {} triangles)",
        model.name,
        model.meshes.len(),
        model.materials.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    for mesh in &model.meshes {
        let material = mesh
            .material
            .and_then(|i| model.materials.get(i))
            .map_or("-", |m| m.name.as_str());
        let _ = writeln!(
            out,
            "  {} vertices={} triangles={} material={material}",
            mesh.name,
            mesh.mesh.vertex_count(),
            mesh.mesh.triangle_count()
        );
    }
    let (min, max, c) = (bounds.min, bounds.max, bounds.center());
    let _ = writeln!(
        out,
        "bounds min=({:.4}, {:.4}, {:.4}) max=({:.4}, {:.4}, {:.4})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    let _ = writeln!(
        out,
        "center=({:.4}, {:.4}, {:.4}) diagonal={:.4}",
        c.x,
        c.y,
        c.z,
        bounds.diagonal()
    );
    let _ = writeln!(out, "framed {}", format_pose(&pose));
    Ok(out)
}

fn describe(config: Option<&Path>) -> Result<String> {
    let config = match config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    let mut store = AssetStore::new();
    let demo = build_scene(&config, &mut store)?;
    let camera = PerspectiveCamera::from_config(&config.camera);
    tracing::debug!(
        meshes = store.meshes().count(),
        materials = store.materials().count(),
        "scene assets registered"
    );
    Ok(DebugTextRenderer::new().render(&demo.scene, &camera))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let output = match cli.command {
        Commands::Info => info(),
        Commands::Frame {
            box_size,
            size_to_fit,
            fov,
            camera,
            center,
            json,
        } => frame(box_size, size_to_fit, fov, camera, center, json)?,
        Commands::Inspect { mtl, obj, json } => inspect(&mtl, &obj, json)?,
        Commands::Describe { config } => describe(config.as_deref())?,
    };
    println!("{}", output.trim_end());

    Ok(())
}
