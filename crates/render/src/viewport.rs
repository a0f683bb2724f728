use crate::camera::PerspectiveCamera;

/// Drawing-buffer size tracked against the display size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Adopt the display size if it differs from the buffer size.
    /// Returns `true` when the buffer was resized.
    pub fn resize_to_display(&mut self, display_width: u32, display_height: u32) -> bool {
        let next = Self::new(display_width, display_height);
        if next == *self {
            return false;
        }
        tracing::debug!(
            from = ?(self.width, self.height),
            to = ?(next.width, next.height),
            "viewport resized"
        );
        *self = next;
        true
    }

    /// Resize to the display and, if that changed anything, refresh the
    /// camera's aspect ratio and projection.
    pub fn sync_camera(
        &mut self,
        display_width: u32,
        display_height: u32,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if !self.resize_to_display(display_width, display_height) {
            return false;
        }
        camera.set_aspect(self.width, self.height);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_reports_changes_once() {
        let mut vp = Viewport::new(300, 150);
        assert!(!vp.resize_to_display(300, 150));
        assert!(vp.resize_to_display(1280, 720));
        assert!(!vp.resize_to_display(1280, 720));
        assert_eq!((vp.width, vp.height), (1280, 720));
    }

    #[test]
    fn zero_sizes_clamp_to_one() {
        let mut vp = Viewport::new(0, 0);
        assert_eq!((vp.width, vp.height), (1, 1));
        assert!(!vp.resize_to_display(0, 0));
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn sync_camera_updates_aspect_only_on_change() {
        let mut vp = Viewport::new(300, 150);
        let mut cam = PerspectiveCamera::default();
        assert!(!vp.sync_camera(300, 150, &mut cam));
        assert_eq!(cam.aspect, 2.0);
        assert!(vp.sync_camera(800, 800, &mut cam));
        assert_eq!(cam.aspect, 1.0);
    }
}
