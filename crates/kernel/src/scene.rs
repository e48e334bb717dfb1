use crate::camera::Camera;
use crate::wind::WindSimulator;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shellfur_common::{ShellConfig, ShellLayerConfig};
use shellfur_input::{Action, InputSnapshot};

/// Display and control modes flipped by the toggle actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// Input and rendering use the spectator camera.
    pub use_debug_camera: bool,
    /// Pointer is released for the tuning panel; look and zoom are ignored.
    pub ui_mode: bool,
    pub flashlight: bool,
    pub wireframe: bool,
}

/// What the platform layer has to act on after a frame step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub close_requested: bool,
    /// UI mode flipped this frame; the pointer grab must follow `Modes::ui_mode`.
    pub ui_mode_changed: bool,
}

/// The whole mutable application state.
///
/// Owns both cameras, the wind simulator and the shell tuning values. The
/// renderer reads from it; only [`Scene::step`] and the tuning accessors
/// mutate it.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    debug_camera: Camera,
    wind: WindSimulator,
    shell: ShellLayerConfig,
    modes: Modes,
    elapsed: f32,
    frame: u64,
    debug_offset: Vec3,
    speed_step: f32,
}

impl Scene {
    pub fn new(config: &ShellConfig) -> Self {
        let camera = Camera::new(&config.camera);
        let mut debug_camera = Camera::new(&config.camera);
        debug_camera.position = camera.position + config.camera.debug_offset;
        debug_camera.look_at(camera.position);
        let wind = WindSimulator::new(&config.wind, camera.position);
        Self {
            camera,
            debug_camera,
            wind,
            shell: config.shell.clone(),
            modes: Modes::default(),
            elapsed: 0.0,
            frame: 0,
            debug_offset: config.camera.debug_offset,
            speed_step: config.camera.speed_step,
        }
    }

    /// The player camera. The flashlight is always attached to it.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn debug_camera(&self) -> &Camera {
        &self.debug_camera
    }

    /// Camera that receives input and provides the view.
    pub fn active_camera(&self) -> &Camera {
        if self.modes.use_debug_camera {
            &self.debug_camera
        } else {
            &self.camera
        }
    }

    fn active_camera_mut(&mut self) -> &mut Camera {
        if self.modes.use_debug_camera {
            &mut self.debug_camera
        } else {
            &mut self.camera
        }
    }

    pub fn wind(&self) -> &WindSimulator {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindSimulator {
        &mut self.wind
    }

    /// Wind passed to the shell shader this frame.
    pub fn wind_total(&self) -> Vec3 {
        self.wind.total(self.elapsed)
    }

    pub fn shell(&self) -> &ShellLayerConfig {
        &self.shell
    }

    /// Live-tunable shell values. The layer count is fixed once a renderer
    /// has been built.
    pub fn shell_mut(&mut self) -> &mut ShellLayerConfig {
        &mut self.shell
    }

    pub fn modes(&self) -> Modes {
        self.modes
    }

    /// Seconds of simulated time.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame: spectator follow, input routing, wind.
    ///
    /// `previous` is the snapshot handed to the previous call; toggles fire
    /// only on a released-to-pressed transition between the two.
    pub fn step(&mut self, previous: &InputSnapshot, current: &InputSnapshot, dt: f32) -> StepOutcome {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.frame += 1;

        self.follow_player();
        let outcome = self.route_input(previous, current, dt);
        let position = self.active_camera().position;
        self.wind.update(position, dt);
        outcome
    }

    /// Keep the parked spectator hovering over the player, facing it.
    fn follow_player(&mut self) {
        if self.modes.use_debug_camera {
            return;
        }
        self.debug_camera.position = self.camera.position + self.debug_offset;
        self.debug_camera.look_at(self.camera.position);
    }

    fn route_input(&mut self, previous: &InputSnapshot, current: &InputSnapshot, dt: f32) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let ui_mode = self.modes.ui_mode;
        let step = self.speed_step;
        let cam = self.active_camera_mut();

        if !ui_mode {
            let look = current.look_delta();
            if look != glam::Vec2::ZERO {
                cam.apply_look_delta(look.x, look.y);
            }
            if current.scroll() != 0.0 {
                cam.apply_zoom(current.scroll());
            }
        }

        for action in current.held().filter(|a| !a.is_edge_triggered()) {
            match action {
                Action::MoveForward => cam.move_forward(dt),
                Action::MoveBackward => cam.move_backward(dt),
                Action::MoveLeft => cam.move_left(dt),
                Action::MoveRight => cam.move_right(dt),
                Action::MoveUp => cam.move_up(dt),
                Action::MoveDown => cam.move_down(dt),
                Action::SpeedUp => cam.increase_speed(step),
                Action::SpeedDown => cam.decrease_speed(step),
                Action::ResetCamera => cam.reset(),
                Action::Quit => outcome.close_requested = true,
                Action::FillMode
                | Action::WireframeMode
                | Action::ToggleDebugCamera
                | Action::ToggleUiMode
                | Action::ToggleFlashlight => {}
            }
        }

        if current.is_held(Action::FillMode) {
            self.modes.wireframe = false;
        } else if current.is_held(Action::WireframeMode) {
            self.modes.wireframe = true;
        }

        let toggled: Vec<Action> = current
            .held()
            .filter(|a| a.is_edge_triggered() && current.just_pressed(previous, *a))
            .collect();
        for action in toggled {
            self.toggle(action, &mut outcome);
        }

        outcome
    }

    fn toggle(&mut self, action: Action, outcome: &mut StepOutcome) {
        match action {
            Action::ToggleDebugCamera => {
                self.modes.use_debug_camera = !self.modes.use_debug_camera;
                tracing::debug!(enabled = self.modes.use_debug_camera, "debug camera toggled");
            }
            Action::ToggleUiMode => {
                self.modes.ui_mode = !self.modes.ui_mode;
                self.camera.rearm_first_sample();
                self.debug_camera.rearm_first_sample();
                outcome.ui_mode_changed = true;
                tracing::debug!(enabled = self.modes.ui_mode, "ui mode toggled");
            }
            Action::ToggleFlashlight => {
                self.modes.flashlight = !self.modes.flashlight;
                tracing::debug!(enabled = self.modes.flashlight, "flashlight toggled");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn scene() -> Scene {
        Scene::new(&ShellConfig::default())
    }

    fn pressed(actions: &[Action]) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        for &a in actions {
            input.press(a);
        }
        input
    }

    fn mode_for(modes: Modes, action: Action) -> bool {
        match action {
            Action::ToggleDebugCamera => modes.use_debug_camera,
            Action::ToggleUiMode => modes.ui_mode,
            Action::ToggleFlashlight => modes.flashlight,
            other => panic!("{other:?} is not a toggle"),
        }
    }

    #[test]
    fn toggle_held_for_many_frames_flips_once() {
        for action in [
            Action::ToggleDebugCamera,
            Action::ToggleUiMode,
            Action::ToggleFlashlight,
        ] {
            let mut scene = scene();
            let mut previous = InputSnapshot::new();
            let current = pressed(&[action]);
            for _ in 0..10 {
                scene.step(&previous, &current, DT);
                previous = current.carry_over();
            }
            assert!(mode_for(scene.modes(), action), "{action:?} should be on");

            // Release, then press again: second flip.
            let released = InputSnapshot::new();
            scene.step(&previous, &released, DT);
            scene.step(&released, &current, DT);
            assert!(!mode_for(scene.modes(), action), "{action:?} should be off");
        }
    }

    #[test]
    fn simultaneous_toggles_each_flip() {
        let mut scene = scene();
        let all = pressed(&[Action::ToggleDebugCamera, Action::ToggleFlashlight]);
        scene.step(&InputSnapshot::new(), &all, DT);
        assert!(scene.modes().use_debug_camera);
        assert!(scene.modes().flashlight);
        assert!(!scene.modes().ui_mode);
    }

    #[test]
    fn debug_camera_follows_player_while_parked() {
        let mut scene = scene();
        let forward = pressed(&[Action::MoveForward]);
        let mut previous = InputSnapshot::new();
        for _ in 0..30 {
            scene.step(&previous, &forward, DT);
            previous = forward.carry_over();
        }
        // Follow runs before movement, so it trails by one frame.
        scene.step(&previous, &InputSnapshot::new(), DT);

        let player = scene.camera().position;
        let spectator = scene.debug_camera();
        assert!(spectator.position.abs_diff_eq(player + Vec3::splat(10.0), 1e-4));
        let to_player = (player - spectator.position).normalize();
        assert!(spectator.front().abs_diff_eq(to_player, 1e-4));
    }

    #[test]
    fn input_goes_to_debug_camera_when_active() {
        let mut scene = scene();
        let toggle = pressed(&[Action::ToggleDebugCamera]);
        scene.step(&InputSnapshot::new(), &toggle, DT);
        assert!(scene.modes().use_debug_camera);

        let player_before = scene.camera().position;
        let spectator_before = scene.debug_camera().position;
        let up = pressed(&[Action::MoveUp]);
        scene.step(&toggle, &up, 0.05);

        assert_eq!(scene.camera().position, player_before);
        assert!(scene.debug_camera().position.y > spectator_before.y);
    }

    #[test]
    fn ui_mode_blocks_look_and_zoom() {
        let mut scene = scene();
        let toggle = pressed(&[Action::ToggleUiMode]);
        let out = scene.step(&InputSnapshot::new(), &toggle, DT);
        assert!(out.ui_mode_changed);
        assert!(scene.modes().ui_mode);

        let mut look = InputSnapshot::new();
        look.add_look_delta(Vec2::new(200.0, 80.0));
        look.add_scroll(5.0);
        scene.step(&toggle, &look, DT);
        scene.step(&InputSnapshot::new(), &look, DT);

        assert_eq!(scene.camera().yaw(), -90.0);
        assert_eq!(scene.camera().fov(), 45.0);
    }

    #[test]
    fn leaving_ui_mode_swallows_first_look_delta() {
        let mut scene = scene();
        let toggle = pressed(&[Action::ToggleUiMode]);
        scene.step(&InputSnapshot::new(), &toggle, DT);
        scene.step(&toggle, &InputSnapshot::new(), DT);
        scene.step(&InputSnapshot::new(), &toggle, DT);
        assert!(!scene.modes().ui_mode);
        assert!(scene.camera().awaiting_first_sample());

        let mut look = InputSnapshot::new();
        look.add_look_delta(Vec2::new(300.0, 0.0));
        scene.step(&toggle, &look, DT);
        assert_eq!(scene.camera().yaw(), -90.0);

        scene.step(&look.carry_over(), &look, DT);
        assert!((scene.camera().yaw() - -60.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_zooms_active_camera() {
        let mut scene = scene();
        let mut input = InputSnapshot::new();
        input.add_scroll(60.0);
        scene.step(&InputSnapshot::new(), &input, DT);
        assert_eq!(scene.camera().fov(), 1.0);
    }

    #[test]
    fn speed_keys_adjust_per_frame_with_floor() {
        let mut scene = scene();
        let up = pressed(&[Action::SpeedUp]);
        for _ in 0..4 {
            scene.step(&up, &up, DT);
        }
        assert!((scene.camera().speed() - 3.0).abs() < 1e-5);

        let down = pressed(&[Action::SpeedDown]);
        for _ in 0..40 {
            scene.step(&down, &down, DT);
        }
        assert_eq!(scene.camera().speed(), 0.25);
    }

    #[test]
    fn reset_restores_pose_and_rearms() {
        let mut scene = scene();
        let fwd = pressed(&[Action::MoveForward]);
        scene.step(&InputSnapshot::new(), &fwd, 0.05);
        let reset = pressed(&[Action::ResetCamera]);
        scene.step(&fwd, &reset, DT);
        assert_eq!(scene.camera().position, Vec3::new(0.0, 0.0, 3.0));
        assert!(scene.camera().awaiting_first_sample());
    }

    #[test]
    fn fill_and_wireframe_keys() {
        let mut scene = scene();
        scene.step(&InputSnapshot::new(), &pressed(&[Action::WireframeMode]), DT);
        assert!(scene.modes().wireframe);
        scene.step(&InputSnapshot::new(), &pressed(&[Action::FillMode]), DT);
        assert!(!scene.modes().wireframe);
    }

    #[test]
    fn quit_requests_close() {
        let mut scene = scene();
        let out = scene.step(&InputSnapshot::new(), &pressed(&[Action::Quit]), DT);
        assert!(out.close_requested);
        let out = scene.step(&InputSnapshot::new(), &InputSnapshot::new(), DT);
        assert!(!out.close_requested);
    }

    #[test]
    fn moving_forward_blows_wind_backward() {
        let mut scene = scene();
        let fwd = pressed(&[Action::MoveForward]);
        for _ in 0..20 {
            scene.step(&fwd, &fwd, DT);
        }
        // Camera moves toward -z, wind points toward +z.
        assert!(scene.wind().wind().z > 0.0);
        assert!(scene.wind().wind().length() <= 2.0 + 1e-5);
    }

    #[test]
    fn zero_dt_frame_is_harmless() {
        let mut scene = scene();
        let fwd = pressed(&[Action::MoveForward]);
        scene.step(&InputSnapshot::new(), &fwd, 0.0);
        scene.step(&fwd, &fwd, f32::NAN);
        assert!(scene.wind().wind().is_finite());
        assert_eq!(scene.camera().position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(scene.frame(), 2);
    }
}
