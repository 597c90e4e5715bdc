use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::action::{Axis, CameraAction, KeyInput, Sign};

/// Movement multiplier while shift is held.
pub const FAST_MULTIPLIER: f32 = 10.0;

/// Starting view: above the map edge looking back along -Y, Z up.
pub fn default_camera() -> Mat4 {
    Mat4::look_at_rh(Vec3::new(4.0, 7.0, 2.0), Vec3::new(4.0, 0.0, 0.0), Vec3::Z)
}

/// Integrates movement and rotation intent into the world-to-view matrix.
///
/// Intent is set by discrete key events and applied continuously by
/// [`advance`](Self::advance), so motion speed is independent of the tick rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    camera: Mat4,
    movement: Vec3,
    rotation: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(default_camera())
    }
}

impl CameraController {
    pub fn new(camera: Mat4) -> Self {
        Self {
            camera,
            movement: Vec3::ZERO,
            rotation: 0.0,
        }
    }

    /// Current world-to-view matrix.
    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    /// Movement intent in units per second.
    pub fn movement(&self) -> Vec3 {
        self.movement
    }

    /// Rotation intent: -1, 0 or 1 quarter turns per second.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn on_directional_input(&mut self, axis: Axis, sign: Sign, magnitude: f32) {
        self.movement[axis.index()] = sign.value() * magnitude;
    }

    pub fn on_directional_release(&mut self, axis: Axis) {
        self.movement[axis.index()] = 0.0;
    }

    pub fn on_rotate_input(&mut self, sign: Sign) {
        self.rotation = sign.value();
    }

    pub fn on_rotate_release(&mut self) {
        self.rotation = 0.0;
    }

    /// Apply a key event. Returns whether the intent changed.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        if input.repeat {
            return false;
        }
        let Some(action) = input.key.action() else {
            return false;
        };
        let before = (self.movement, self.rotation);
        let magnitude = if input.shift { FAST_MULTIPLIER } else { 1.0 };
        match (action, input.pressed) {
            (CameraAction::Move { axis, sign }, true) => {
                self.on_directional_input(axis, sign, magnitude)
            }
            (CameraAction::Move { axis, .. }, false) => self.on_directional_release(axis),
            (CameraAction::Rotate(sign), true) => self.on_rotate_input(sign),
            (CameraAction::Rotate(_), false) => self.on_rotate_release(),
        }
        let changed = before != (self.movement, self.rotation);
        if changed {
            tracing::debug!(
                movement = ?self.movement,
                rotation = self.rotation,
                "camera intent changed"
            );
        }
        changed
    }

    /// Translate by `movement * dt`, then turn about Z by
    /// `rotation * pi/2 * dt`. Both are applied in camera space.
    pub fn advance(&mut self, elapsed_secs: f32) {
        let translation = self.movement * elapsed_secs;
        self.camera *= Mat4::from_translation(translation);
        self.camera *= Mat4::from_rotation_z(self.rotation * FRAC_PI_2 * elapsed_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::LogicalKey;

    #[test]
    fn default_camera_looks_down_the_map() {
        let controller = CameraController::default();
        let view = controller.camera();
        let target = view.transform_point3(Vec3::new(4.0, 0.0, 0.0));
        // Target sits straight ahead (negative view Z) on the view axis.
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5);
        assert!(target.z < 0.0);
    }

    #[test]
    fn key_down_sets_and_key_up_clears_intent() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        assert!(controller.handle_key(&KeyInput::down(LogicalKey::D)));
        assert_eq!(controller.movement(), Vec3::X);
        assert!(controller.handle_key(&KeyInput::up(LogicalKey::D)));
        assert_eq!(controller.movement(), Vec3::ZERO);
    }

    #[test]
    fn shift_selects_fast_multiplier() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        controller.handle_key(&KeyInput::down(LogicalKey::S).with_shift());
        assert_eq!(controller.movement(), Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn repeated_key_down_is_ignored() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        controller.handle_key(&KeyInput::down(LogicalKey::W));
        let after_first = controller.clone();

        let repeat = KeyInput::down(LogicalKey::W).with_shift().repeated();
        assert!(!controller.handle_key(&repeat));
        assert!(!controller.handle_key(&repeat));
        assert_eq!(controller, after_first);
    }

    #[test]
    fn repeat_flagged_events_alone_change_nothing() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        let repeat = KeyInput::down(LogicalKey::PageUp).repeated();
        controller.handle_key(&repeat);
        controller.handle_key(&repeat);
        assert_eq!(controller.movement(), Vec3::ZERO);
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        assert!(!controller.handle_key(&KeyInput::down(LogicalKey::Other)));
    }

    #[test]
    fn advance_translates_by_intent_times_elapsed() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        controller.on_directional_input(Axis::X, Sign::Positive, 1.0);
        controller.on_directional_input(Axis::Z, Sign::Negative, 10.0);
        controller.advance(0.5);
        let moved = controller.camera().transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(Vec3::new(0.5, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn advance_rotates_a_quarter_turn_per_second() {
        let mut controller = CameraController::new(Mat4::IDENTITY);
        controller.handle_key(&KeyInput::down(LogicalKey::Q));
        controller.advance(1.0);
        let turned = controller.camera().transform_vector3(Vec3::X);
        assert!(turned.abs_diff_eq(Vec3::Y, 1e-5));

        controller.handle_key(&KeyInput::up(LogicalKey::Q));
        controller.handle_key(&KeyInput::down(LogicalKey::E));
        controller.advance(1.0);
        let back = controller.camera().transform_vector3(Vec3::X);
        assert!(back.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn idle_advance_keeps_camera() {
        let mut controller = CameraController::default();
        let before = controller.camera();
        controller.advance(3.0);
        assert!(controller.camera().abs_diff_eq(before, 1e-6));
    }
}
