use crate::SceneError;
use crate::scene::Scene;
use glam::{EulerRot, Quat};
use vista_common::NodeId;

/// Spin `shapes` about X and Y. Shape `i` turns at `1 + 0.1 * i` radians per
/// second, so neighbouring shapes drift out of phase.
pub fn spin(scene: &mut Scene, shapes: &[NodeId], time_secs: f32) -> Result<(), SceneError> {
    for (ndx, id) in shapes.iter().enumerate() {
        let speed = 1.0 + ndx as f32 * 0.1;
        let rot = time_secs * speed;
        let node = scene.get_mut(*id).ok_or(SceneError::NodeNotFound(*id))?;
        node.transform.rotation = Quat::from_euler(EulerRot::XYZ, rot, rot, 0.0);
    }
    Ok(())
}
