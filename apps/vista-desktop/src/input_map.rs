use vista_input::Action;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of trackpad scroll that count as one wheel step.
const PIXELS_PER_STEP: f32 = 100.0;

/// Turns raw pointer and keyboard input into viewer actions.
///
/// Left drag orbits, right drag pans, the wheel zooms.
#[derive(Debug, Default)]
pub struct InputMap {
    orbiting: bool,
    panning: bool,
    cursor: Option<(f32, f32)>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.orbiting = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Track the cursor; while a button is held the movement becomes an
    /// orbit or pan action.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Action {
        let previous = self.cursor.replace((x, y));
        let Some((px, py)) = previous else {
            return Action::Noop;
        };
        let (dx, dy) = (x - px, y - py);
        if self.orbiting {
            Action::Orbit { dx, dy }
        } else if self.panning {
            Action::Pan { dx, dy }
        } else {
            Action::Noop
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn wheel(&self, delta: MouseScrollDelta) -> Action {
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_STEP,
        };
        if steps == 0.0 {
            Action::Noop
        } else {
            Action::Zoom(steps)
        }
    }

    pub fn key(&self, key: KeyCode) -> Action {
        match key {
            KeyCode::KeyF => Action::Reframe,
            KeyCode::F1 => Action::ToggleOverlay,
            _ => Action::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn left_drag_orbits() {
        let mut map = InputMap::new();
        assert_eq!(map.cursor_moved(10.0, 10.0), Action::Noop);
        map.button(MouseButton::Left, true);
        assert_eq!(map.cursor_moved(15.0, 7.0), Action::Orbit { dx: 5.0, dy: -3.0 });
        map.button(MouseButton::Left, false);
        assert_eq!(map.cursor_moved(20.0, 7.0), Action::Noop);
    }

    #[test]
    fn right_drag_pans() {
        let mut map = InputMap::new();
        map.cursor_moved(0.0, 0.0);
        map.button(MouseButton::Right, true);
        assert_eq!(map.cursor_moved(0.0, 4.0), Action::Pan { dx: 0.0, dy: 4.0 });
    }

    #[test]
    fn first_move_after_leaving_has_no_delta() {
        let mut map = InputMap::new();
        map.button(MouseButton::Left, true);
        map.cursor_moved(0.0, 0.0);
        map.cursor_left();
        assert_eq!(map.cursor_moved(500.0, 500.0), Action::Noop);
    }

    #[test]
    fn wheel_zooms() {
        let map = InputMap::new();
        assert_eq!(map.wheel(MouseScrollDelta::LineDelta(0.0, 2.0)), Action::Zoom(2.0));
        assert_eq!(
            map.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -50.0))),
            Action::Zoom(-0.5)
        );
        assert_eq!(map.wheel(MouseScrollDelta::LineDelta(1.0, 0.0)), Action::Noop);
    }

    #[test]
    fn key_bindings() {
        let map = InputMap::new();
        assert_eq!(map.key(KeyCode::KeyF), Action::Reframe);
        assert_eq!(map.key(KeyCode::F1), Action::ToggleOverlay);
        assert_eq!(map.key(KeyCode::KeyQ), Action::Noop);
    }
}
