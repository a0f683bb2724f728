//! Orbit controls: rotate around, dolly towards and pan a target point.
//!
//! Input accumulates between frames and is applied in one step by
//! [`OrbitControls::update`], which reads the camera's current offset from
//! the target as spherical coordinates, applies the pending deltas, clamps,
//! and writes the camera back.

use crate::action::Action;
use glam::Vec3;
use std::f32::consts::PI;
use vista_render::PerspectiveCamera;

const EPS: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fractional distance change per wheel step.
    pub zoom_speed: f32,
    /// World units per pixel, per unit of distance to the target.
    pub pan_speed: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar: f32,
    pub max_polar: f32,

    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    pending_pan: (f32, f32),
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
            pan_speed: 0.002,
            min_polar: 0.0,
            max_polar: PI,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            pending_pan: (0.0, 0.0),
        }
    }

    /// Queue a drag rotation. Dragging right swings the camera left around
    /// the target; dragging down raises it.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_theta -= dx * self.rotate_speed;
        self.pending_phi -= dy * self.rotate_speed;
    }

    /// Queue a dolly. Positive steps move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= (1.0 - self.zoom_speed).powf(steps);
    }

    /// Queue a pan. The scene follows the pointer.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan.0 += dx;
        self.pending_pan.1 += dy;
    }

    /// Route a camera-motion action into the pending input. Returns `false`
    /// for actions the controls don't handle.
    pub fn handle(&mut self, action: &Action) -> bool {
        match *action {
            Action::Orbit { dx, dy } => self.rotate(dx, dy),
            Action::Pan { dx, dy } => self.pan(dx, dy),
            Action::Zoom(steps) => self.zoom(steps),
            _ => return false,
        }
        true
    }

    fn has_pending(&self) -> bool {
        self.pending_theta != 0.0
            || self.pending_phi != 0.0
            || self.pending_scale != 1.0
            || self.pending_pan != (0.0, 0.0)
    }

    /// Apply pending input and the distance and polar limits to `camera`,
    /// then point it at [`target`](Self::target). Returns whether the camera
    /// moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = (camera.position, camera.target);
        let had_input = self.has_pending();

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            radius = self.min_distance.max(EPS);
            (0.0, PI / 2.0)
        };

        if self.pending_pan != (0.0, 0.0) {
            let forward = (-offset).normalize_or_zero();
            let right = forward.cross(camera.up).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();
            let scale = self.pan_speed * radius;
            let (dx, dy) = self.pending_pan;
            self.target += (-right * dx + up * dy) * scale;
        }

        theta += self.pending_theta;
        let (min_polar, max_polar) = ordered(self.min_polar, self.max_polar);
        phi = clamp_between(phi + self.pending_phi, min_polar.max(EPS), max_polar.min(PI - EPS));
        let (min_distance, max_distance) = ordered(self.min_distance, self.max_distance);
        radius = clamp_between(radius * self.pending_scale, min_distance, max_distance);

        let sin_phi = phi.sin();
        camera.position = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
        camera.look_at(self.target);

        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_scale = 1.0;
        self.pending_pan = (0.0, 0.0);

        let moved = !camera.position.abs_diff_eq(before.0, 1e-4) || camera.target != before.1;
        if had_input && moved {
            tracing::trace!(position = ?camera.position, target = ?self.target, "orbit update");
        }
        moved
    }
}

/// Limits as `(low, high)` whichever way round they were set. A NaN limit
/// leaves that side unbounded.
fn ordered(min: f32, max: f32) -> (f32, f32) {
    let min = if min.is_nan() { f32::NEG_INFINITY } else { min };
    let max = if max.is_nan() { f32::INFINITY } else { max };
    (min.min(max), min.max(max))
}

/// `f32::clamp` without the panic on inverted or NaN bounds.
fn clamp_between(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::default();
        cam.look_at(Vec3::new(0.0, 5.0, 0.0));
        cam
    }

    #[test]
    fn idle_update_is_stable() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(Vec3::new(0.0, 5.0, 0.0));
        let start = cam.position;
        assert!(!controls.update(&mut cam));
        assert!(cam.position.abs_diff_eq(start, 1e-3));
    }

    #[test]
    fn update_retargets_camera() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(controls.update(&mut cam));
        assert_eq!(cam.target, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rotate_keeps_distance() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera();
        let mut controls = OrbitControls::new(target);
        let dist = cam.position.distance(target);
        controls.rotate(120.0, -30.0);
        assert!(controls.update(&mut cam));
        assert!((cam.position.distance(target) - dist).abs() < 1e-3);
        assert!(cam.position.x < 0.0);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera();
        let mut controls = OrbitControls::new(target);
        controls.max_distance = 30.0;
        controls.min_distance = 2.0;

        controls.zoom(-100.0);
        controls.update(&mut cam);
        assert!((cam.position.distance(target) - 30.0).abs() < 1e-3);

        controls.zoom(500.0);
        controls.update(&mut cam);
        assert!((cam.position.distance(target) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn framing_then_update_clamps_to_max_distance() {
        let center = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera();
        cam.position = Vec3::new(0.0, 5.0, 200.0);
        let mut controls = OrbitControls::default();
        controls.max_distance = 100.0;
        controls.target = center;
        assert!(controls.update(&mut cam));
        assert!((cam.position.distance(center) - 100.0).abs() < 1e-3);
        assert_eq!(cam.target, center);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(Vec3::new(0.0, 5.0, 0.0));
        controls.max_polar = PI / 2.0;
        controls.rotate(0.0, -10_000.0);
        controls.update(&mut cam);
        assert!(cam.position.y >= 5.0 - 1e-3);
    }

    #[test]
    fn inverted_distance_limits_do_not_panic() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera();
        let mut controls = OrbitControls::new(target);
        // A negative max-distance factor from config yields max < min.
        controls.max_distance = 10.0 * -1.0;
        controls.update(&mut cam);
        assert!(cam.position.is_finite());
        assert!(cam.position.distance(target) < 1e-3);

        controls.min_distance = 20.0;
        controls.max_distance = 5.0;
        controls.zoom(-50.0);
        controls.update(&mut cam);
        let d = cam.position.distance(target);
        assert!((5.0 - 1e-3..=20.0 + 1e-3).contains(&d));
    }

    #[test]
    fn nan_limits_are_unbounded() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera();
        let mut controls = OrbitControls::new(target);
        let dist = cam.position.distance(target);
        controls.max_distance = f32::NAN;
        controls.min_polar = f32::NAN;
        controls.max_polar = 0.5;
        controls.rotate(10.0, 10.0);
        controls.update(&mut cam);
        assert!(cam.position.is_finite());
        assert!((cam.position.distance(target) - dist).abs() < 1e-3);
        assert!(cam.position.y > target.y);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(Vec3::new(0.0, 5.0, 0.0));
        let offset_before = cam.position - controls.target;
        assert!(controls.handle(&Action::Pan { dx: 50.0, dy: 0.0 }));
        controls.update(&mut cam);
        assert!(controls.target.x < 0.0);
        assert!((cam.position - controls.target).abs_diff_eq(offset_before, 1e-3));
    }

    #[test]
    fn non_motion_actions_are_not_handled() {
        let mut controls = OrbitControls::default();
        assert!(!controls.handle(&Action::Reframe));
        assert!(controls.handle(&Action::Zoom(1.0)));
    }
}
