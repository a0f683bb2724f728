//! Bounding-box framing: place the camera so a box fills a chosen on-screen
//! height.
//!
//! # Invariants
//! - The camera keeps its horizontal bearing around the box; elevation is
//!   dropped, so the framed camera sits level with the box center.
//! - `near = box_size / 100`, `far = box_size * 100`.
//! - Framing is pure: it returns a [`CameraPose`] and never touches the
//!   camera. [`PerspectiveCamera::apply_pose`] writes it.

use crate::camera::PerspectiveCamera;
use glam::Vec3;
use serde::Serialize;
use vista_common::Aabb;

/// On-screen size of a framed box as a multiple of its diagonal.
pub const DEFAULT_FIT_MARGIN: f32 = 1.2;

/// Camera placement produced by framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub near: f32,
    pub far: f32,
}

impl CameraPose {
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FramingError {
    /// The camera is directly above, below or at the box center, so there
    /// is no horizontal bearing to keep.
    #[error(
        "camera at {camera} is vertically aligned with box center {center}: horizontal bearing is undefined"
    )]
    InvalidGeometry { camera: Vec3, center: Vec3 },
    #[error("cannot frame an empty bounding box")]
    EmptyBounds,
}

/// Distance at which an object `size_to_fit` tall exactly fills a vertical
/// field of view of `fov_degrees`.
pub fn fit_distance(size_to_fit: f32, fov_degrees: f32) -> f32 {
    let half_fov_y = (fov_degrees * 0.5).to_radians();
    (size_to_fit * 0.5) / half_fov_y.tan()
}

/// Compute the pose that frames a box of diagonal `box_size` centered at
/// `box_center` so that `size_to_fit` world units fill the camera's vertical
/// field of view.
///
/// Numeric inputs are not validated: a zero or negative size or field of
/// view yields whatever the arithmetic yields.
pub fn frame_area(
    size_to_fit: f32,
    box_size: f32,
    box_center: Vec3,
    camera: &PerspectiveCamera,
) -> Result<CameraPose, FramingError> {
    let distance = fit_distance(size_to_fit, camera.fov_degrees);

    let offset = camera.position - box_center;
    let direction = Vec3::new(offset.x, 0.0, offset.z)
        .try_normalize()
        .ok_or(FramingError::InvalidGeometry {
            camera: camera.position,
            center: box_center,
        })?;

    Ok(CameraPose {
        position: box_center + direction * distance,
        target: box_center,
        near: box_size / 100.0,
        far: box_size * 100.0,
    })
}

/// Frame `bounds` with [`DEFAULT_FIT_MARGIN`].
pub fn frame_box(bounds: &Aabb, camera: &PerspectiveCamera) -> Result<CameraPose, FramingError> {
    frame_box_with_margin(bounds, camera, DEFAULT_FIT_MARGIN)
}

/// Frame `bounds` so that `margin` times its diagonal fills the view.
pub fn frame_box_with_margin(
    bounds: &Aabb,
    camera: &PerspectiveCamera,
    margin: f32,
) -> Result<CameraPose, FramingError> {
    if bounds.is_empty() {
        return Err(FramingError::EmptyBounds);
    }
    let box_size = bounds.diagonal();
    let pose = frame_area(box_size * margin, box_size, bounds.center(), camera)?;
    tracing::debug!(
        box_size,
        distance = pose.distance(),
        near = pose.near,
        far = pose.far,
        "framed bounding box"
    );
    Ok(pose)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3, fov: f32) -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(fov, 2.0, 0.1, 100.0);
        cam.position = position;
        cam
    }

    #[test]
    fn distance_matches_half_angle_relation() {
        let center = Vec3::new(3.0, -2.0, 7.0);
        for fov in [1.0_f32, 30.0, 45.0, 90.0, 120.0, 179.0] {
            for size in [1.0_f32, 12.0, 5000.0] {
                let cam = camera_at(Vec3::new(-40.0, 25.0, 9.0), fov);
                let pose = frame_area(size, size / 1.2, center, &cam).unwrap();
                let expected = (size / 2.0) / (fov.to_radians() / 2.0).tan();
                let actual = pose.position.distance(center);
                assert!(
                    (actual - expected).abs() <= expected * 1e-5 + 1e-5,
                    "fov={fov} size={size}: {actual} vs {expected}"
                );
            }
        }
    }

    #[test]
    fn framed_camera_is_level_with_center() {
        let center = Vec3::new(1.0, 42.5, -3.0);
        for start in [
            Vec3::new(0.0, 1000.0, 1.0),
            Vec3::new(10.0, -50.0, 0.0),
            Vec3::new(-3.0, 42.5, 8.0),
        ] {
            let pose = frame_area(12.0, 10.0, center, &camera_at(start, 45.0)).unwrap();
            assert_eq!(pose.position.y - center.y, 0.0);
        }
    }

    #[test]
    fn clip_planes_scale_with_box() {
        for box_size in [0.5_f32, 10.0, 123.4, 1e4] {
            let pose = frame_area(
                box_size * 1.2,
                box_size,
                Vec3::ZERO,
                &camera_at(Vec3::new(1.0, 0.0, 1.0), 45.0),
            )
            .unwrap();
            assert_eq!(pose.near, box_size / 100.0);
            assert_eq!(pose.far, box_size * 100.0);
        }
    }

    #[test]
    fn reframing_converged_camera_is_fixed_point() {
        let center = Vec3::new(0.0, 5.0, 0.0);
        let mut cam = camera_at(Vec3::new(7.0, 10.0, 20.0), 45.0);
        let first = frame_area(12.0, 10.0, center, &cam).unwrap();
        cam.apply_pose(&first);
        let second = frame_area(12.0, 10.0, center, &cam).unwrap();
        assert!(first.position.abs_diff_eq(second.position, 1e-4));
        assert_eq!(first.near, second.near);
        assert_eq!(first.far, second.far);
    }

    #[test]
    fn concrete_scenario() {
        let cam = camera_at(Vec3::new(0.0, 10.0, 20.0), 45.0);
        let center = Vec3::new(0.0, 5.0, 0.0);
        let pose = frame_area(12.0, 10.0, center, &cam).unwrap();

        let expected = 6.0 / 22.5_f32.to_radians().tan();
        assert!((expected - 14.485).abs() < 1e-3);
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 5.0, expected), 1e-4));
        assert_eq!(pose.target, center);
        assert_eq!(pose.near, 0.1);
        assert_eq!(pose.far, 1000.0);
    }

    #[test]
    fn coincident_camera_is_invalid_geometry() {
        let center = Vec3::new(2.0, 3.0, 4.0);
        let err = frame_area(12.0, 10.0, center, &camera_at(center, 45.0)).unwrap_err();
        assert_eq!(
            err,
            FramingError::InvalidGeometry {
                camera: center,
                center
            }
        );
    }

    #[test]
    fn camera_straight_above_is_invalid_geometry() {
        let center = Vec3::ZERO;
        let err = frame_area(12.0, 10.0, center, &camera_at(Vec3::new(0.0, 50.0, 0.0), 45.0))
            .unwrap_err();
        assert!(matches!(err, FramingError::InvalidGeometry { .. }));
    }

    #[test]
    fn apply_pose_updates_camera() {
        let mut cam = camera_at(Vec3::new(0.0, 10.0, 20.0), 45.0);
        let before = cam.projection_matrix();
        let pose = frame_area(12.0, 10.0, Vec3::new(0.0, 5.0, 0.0), &cam).unwrap();
        cam.apply_pose(&pose);
        assert_eq!(cam.position, pose.position);
        assert_eq!(cam.target, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!((cam.near, cam.far), (0.1, 1000.0));
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn frame_box_uses_diagonal_and_margin() {
        let bounds = Aabb::new(Vec3::new(-3.0, 0.0, -4.0), Vec3::new(3.0, 0.0, 4.0));
        let cam = camera_at(Vec3::new(0.0, 10.0, 20.0), 45.0);
        let pose = frame_box(&bounds, &cam).unwrap();
        assert_eq!(pose.near, 10.0 / 100.0);
        assert!((pose.distance() - fit_distance(12.0, 45.0)).abs() < 1e-4);
    }

    #[test]
    fn empty_box_is_rejected() {
        let cam = PerspectiveCamera::default();
        assert_eq!(
            frame_box(&Aabb::empty(), &cam).unwrap_err(),
            FramingError::EmptyBounds
        );
    }
}
