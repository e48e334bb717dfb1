use crate::action::Action;
use glam::Vec2;
use std::collections::BTreeSet;

/// Input state gathered over one frame.
///
/// Held actions persist from frame to frame; pointer and scroll deltas are
/// accumulated during the frame and cleared by [`InputSnapshot::carry_over`].
/// Edge detection compares against an explicit previous-frame snapshot, so
/// no hidden per-call state is needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    held: BTreeSet<Action>,
    look_delta: Vec2,
    scroll: f32,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// True when `action` is held now but was not held in `previous`.
    pub fn just_pressed(&self, previous: &InputSnapshot, action: Action) -> bool {
        self.is_held(action) && !previous.is_held(action)
    }

    pub fn held(&self) -> impl Iterator<Item = Action> + '_ {
        self.held.iter().copied()
    }

    /// Accumulate a raw pointer delta in pixels.
    pub fn add_look_delta(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.look_delta += delta;
        }
    }

    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    /// Accumulate a scroll delta in wheel lines.
    pub fn add_scroll(&mut self, lines: f32) {
        if lines.is_finite() {
            self.scroll += lines;
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Snapshot to start the next frame from: same held actions, no deltas.
    pub fn carry_over(&self) -> InputSnapshot {
        InputSnapshot {
            held: self.held.clone(),
            ..InputSnapshot::default()
        }
    }

    /// Drop every held action, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!("releasing {} held actions", self.held.len());
        }
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut input = InputSnapshot::new();
        input.press(Action::MoveForward);
        assert!(input.is_held(Action::MoveForward));
        input.release(Action::MoveForward);
        assert!(!input.is_held(Action::MoveForward));
    }

    #[test]
    fn just_pressed_only_on_transition() {
        let released = InputSnapshot::new();
        let mut pressed = InputSnapshot::new();
        pressed.press(Action::ToggleFlashlight);

        assert!(pressed.just_pressed(&released, Action::ToggleFlashlight));
        // Held across two frames: no second edge.
        assert!(!pressed.just_pressed(&pressed.clone(), Action::ToggleFlashlight));
        assert!(!released.just_pressed(&pressed, Action::ToggleFlashlight));
    }

    #[test]
    fn carry_over_keeps_keys_and_clears_deltas() {
        let mut input = InputSnapshot::new();
        input.press(Action::MoveLeft);
        input.add_look_delta(Vec2::new(3.0, -2.0));
        input.add_look_delta(Vec2::new(1.0, 1.0));
        input.add_scroll(1.5);
        assert_eq!(input.look_delta(), Vec2::new(4.0, -1.0));
        assert_eq!(input.scroll(), 1.5);

        let next = input.carry_over();
        assert!(next.is_held(Action::MoveLeft));
        assert_eq!(next.look_delta(), Vec2::ZERO);
        assert_eq!(next.scroll(), 0.0);
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut input = InputSnapshot::new();
        input.add_look_delta(Vec2::new(f32::NAN, 1.0));
        input.add_scroll(f32::INFINITY);
        assert_eq!(input.look_delta(), Vec2::ZERO);
        assert_eq!(input.scroll(), 0.0);
    }

    #[test]
    fn release_all_clears_held() {
        let mut input = InputSnapshot::new();
        input.press(Action::MoveUp);
        input.press(Action::SpeedUp);
        input.release_all();
        assert_eq!(input.held().count(), 0);
    }
}
