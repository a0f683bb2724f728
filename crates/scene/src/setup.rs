use crate::SceneError;
use crate::config::SceneConfig;
use crate::light::Light;
use crate::scene::{Node, Renderable, Scene};
use std::f32::consts::FRAC_PI_2;
use vista_assets::{
    AssetStore, LoadedModel, MagFilter, MaterialDesc, MeshData, TextureDesc, box_geometry,
    plane_geometry, sphere_geometry,
};
use vista_common::{NodeId, Transform};

/// The assembled demo scene and the handles the frame loop needs.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub scene: Scene,
    /// Shapes spun each frame, in spin-speed order.
    pub spinning: Vec<NodeId>,
    pub ground: NodeId,
}

fn register(store: &mut AssetStore, mesh: MeshData, material: MaterialDesc) -> Renderable {
    let local_bounds = mesh.bounds();
    Renderable {
        mesh: store.register_mesh(mesh),
        material: store.register_material(material),
        local_bounds,
    }
}

/// Build the demo scene described by `config`, registering its geometry and
/// materials in `store`.
pub fn build_scene(config: &SceneConfig, store: &mut AssetStore) -> Result<DemoScene, SceneError> {
    let mut scene = Scene::new();
    scene.background = config.background;

    let prims = &config.primitives;
    let size = prims.box_size;

    let cube = scene.add(
        Node::mesh(
            "cube",
            register(
                store,
                box_geometry(size.x, size.y, size.z),
                MaterialDesc::phong("cube", prims.color),
            ),
        )
        .with_transform(Transform::from_position(prims.cube_position)),
    );

    let sphere = scene.add(
        Node::mesh(
            "sphere",
            register(
                store,
                sphere_geometry(
                    prims.sphere_radius,
                    prims.sphere_width_segments,
                    prims.sphere_height_segments,
                ),
                MaterialDesc::phong("sphere", prims.color),
            ),
        )
        .with_transform(Transform::from_position(prims.sphere_position)),
    );

    scene.add(
        Node::mesh(
            "textured_cube",
            register(
                store,
                box_geometry(size.x, size.y, size.z),
                MaterialDesc::basic(
                    "textured_cube",
                    TextureDesc::new(&prims.textured_cube_texture),
                ),
            ),
        )
        .with_transform(Transform::from_position(prims.textured_cube_position)),
    );

    let ground_cfg = &config.ground;
    let checker = TextureDesc::new(&ground_cfg.texture)
        .tiled(ground_cfg.repeats())
        .with_mag_filter(MagFilter::Nearest);
    let ground = scene.add(
        Node::mesh(
            "ground",
            register(
                store,
                plane_geometry(ground_cfg.size, ground_cfg.size),
                MaterialDesc::phong("ground", vista_common::Color::WHITE)
                    .with_texture(checker)
                    .double_sided(),
            ),
        )
        .with_transform(Transform::default().with_euler(-FRAC_PI_2, 0.0, 0.0)),
    );

    let hemi = &config.hemisphere_light;
    scene.add_light(Light::Hemisphere {
        sky: hemi.sky,
        ground: hemi.ground,
        intensity: hemi.intensity,
    });
    let dir = &config.directional_light;
    scene.add_light(Light::Directional {
        color: dir.color,
        intensity: dir.intensity,
        position: dir.position,
        target: dir.target,
    });

    tracing::info!(
        nodes = scene.node_count(),
        lights = scene.lights().len(),
        assets = store.len(),
        "demo scene assembled"
    );

    Ok(DemoScene {
        scene,
        spinning: vec![cube, sphere],
        ground,
    })
}

/// Add a loaded model to the scene as a group with one child per mesh.
/// Returns the group's id, whose subtree bounds cover the whole model.
pub fn attach_model(
    scene: &mut Scene,
    store: &mut AssetStore,
    model: &LoadedModel,
) -> Result<NodeId, SceneError> {
    let root = scene.add(Node::group(model.name.clone()));
    let handles = store.register_model(model);
    for (mesh, (mesh_handle, material_handle)) in model.meshes.iter().zip(handles) {
        scene.add_child(
            root,
            Node::mesh(
                mesh.name.clone(),
                Renderable {
                    mesh: mesh_handle,
                    material: material_handle,
                    local_bounds: mesh.mesh.bounds(),
                },
            ),
        )?;
    }
    tracing::debug!(model = %model.name, meshes = model.meshes.len(), "attached model");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::path::PathBuf;
    use vista_assets::{MaterialKind, ModelMesh, WrapMode};

    #[test]
    fn demo_scene_contents() {
        let mut store = AssetStore::new();
        let demo = build_scene(&SceneConfig::default(), &mut store).unwrap();
        assert_eq!(demo.scene.node_count(), 4);
        assert_eq!(demo.scene.lights().len(), 2);
        assert_eq!(demo.spinning.len(), 2);
        assert_eq!(demo.scene.get(demo.spinning[0]).unwrap().name, "cube");
        assert_eq!(demo.scene.get(demo.spinning[1]).unwrap().name, "sphere");
    }

    #[test]
    fn cube_and_textured_cube_share_geometry() {
        let mut store = AssetStore::new();
        let demo = build_scene(&SceneConfig::default(), &mut store).unwrap();
        let scene = &demo.scene;
        let cube = scene.get(scene.find_by_name("cube").unwrap()).unwrap();
        let textured = scene
            .get(scene.find_by_name("textured_cube").unwrap())
            .unwrap();
        let (a, b) = (cube.renderable.unwrap(), textured.renderable.unwrap());
        assert_eq!(a.mesh, b.mesh);
        assert_ne!(a.material, b.material);
        assert_eq!(store.material(b.material).unwrap().kind, MaterialKind::Basic);
    }

    #[test]
    fn ground_lies_flat_and_tiles() {
        let mut store = AssetStore::new();
        let demo = build_scene(&SceneConfig::default(), &mut store).unwrap();
        let bounds = demo.scene.bounding_box(demo.ground).unwrap();
        assert!(bounds.size().y.abs() < 1e-2);
        assert!((bounds.size().x - 4000.0).abs() < 1e-2);
        assert!((bounds.size().z - 4000.0).abs() < 1e-2);

        let material = demo.scene.get(demo.ground).unwrap().renderable.unwrap().material;
        let material = store.material(material).unwrap();
        assert!(material.double_sided);
        let tex = material.texture.as_ref().unwrap();
        assert_eq!(tex.wrap, WrapMode::Repeat);
        assert_eq!(tex.repeat, [20.0, 20.0]);
        assert_eq!(tex.mag_filter, MagFilter::Nearest);
    }

    #[test]
    fn attached_model_bounds() {
        let model = LoadedModel {
            name: "windmill".into(),
            source: PathBuf::from("windmill.obj"),
            meshes: vec![
                ModelMesh {
                    name: "tower".into(),
                    mesh: box_geometry(2.0, 10.0, 2.0),
                    material: None,
                },
                ModelMesh {
                    name: "blades".into(),
                    mesh: plane_geometry(8.0, 8.0),
                    material: None,
                },
            ],
            materials: Vec::new(),
        };
        let mut scene = Scene::new();
        let mut store = AssetStore::new();
        let root = attach_model(&mut scene, &mut store, &model).unwrap();
        assert_eq!(scene.get(root).unwrap().children().len(), 2);
        let b = scene.bounding_box(root).unwrap();
        assert_eq!(b.min, Vec3::new(-4.0, -5.0, -1.0));
        assert_eq!(b.max, Vec3::new(4.0, 5.0, 1.0));
    }

    #[test]
    fn default_config_assets_are_bundled() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let config = SceneConfig::default();

        for texture in [&config.primitives.textured_cube_texture, &config.ground.texture] {
            let data = vista_assets::load_texture(&TextureDesc::new(root.join(texture))).unwrap();
            assert!(data.width > 0 && data.height > 0);
        }

        let paths = config.model.unwrap();
        let model = vista_assets::load_model(&root.join(&paths.mtl), &root.join(&paths.obj)).unwrap();
        assert_eq!(model.meshes.len(), 4);
        assert!(model.meshes.iter().all(|m| m.material.is_some()));

        let mut scene = Scene::new();
        let mut store = AssetStore::new();
        let node = attach_model(&mut scene, &mut store, &model).unwrap();
        assert!(scene.bounding_box(node).unwrap().diagonal() > 0.0);
    }
}
