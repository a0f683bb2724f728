/// A high-level viewer action produced from raw window input.
///
/// Deltas are in physical pixels; zoom is in wheel steps, positive towards
/// the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rotate the camera around the orbit target.
    Orbit { dx: f32, dy: f32 },
    /// Slide the orbit target across the view plane.
    Pan { dx: f32, dy: f32 },
    /// Dolly towards or away from the target.
    Zoom(f32),
    /// Frame the loaded model again.
    Reframe,
    /// Show or hide the overlay.
    ToggleOverlay,
    /// Input that isn't bound to anything.
    Noop,
}

impl Action {
    /// Whether this action moves the camera through the orbit controls.
    pub fn is_camera_motion(&self) -> bool {
        matches!(self, Action::Orbit { .. } | Action::Pan { .. } | Action::Zoom(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_motion_actions() {
        assert!(Action::Orbit { dx: 1.0, dy: 0.0 }.is_camera_motion());
        assert!(Action::Pan { dx: 0.0, dy: 2.0 }.is_camera_motion());
        assert!(Action::Zoom(-1.0).is_camera_motion());
    }

    #[test]
    fn other_actions_leave_camera_alone() {
        assert!(!Action::Reframe.is_camera_motion());
        assert!(!Action::ToggleOverlay.is_camera_motion());
        assert!(!Action::Noop.is_camera_motion());
    }
}
