use glam::{Mat4, Vec3};
use shellfur_common::CameraConfig;

/// Pitch is kept this far from straight up/down so `front` never lines up
/// with the world up axis.
pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_MIN: f32 = 1.0;
pub const FOV_MAX: f32 = 45.0;
pub const MIN_SPEED: f32 = 0.25;
pub const DEFAULT_YAW: f32 = -90.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

const WORLD_UP: Vec3 = Vec3::Y;

/// First-person camera driven by yaw/pitch angles in degrees.
///
/// Yaw and pitch are the only orientation state; `front`, `right` and `up`
/// are derived from them after every mutation and are always orthonormal.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    speed: f32,
    pub sensitivity: f32,
    first_sample: bool,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    home: Vec3,
    default_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let default_speed = config.speed.max(MIN_SPEED);
        let mut camera = Self {
            position: config.start_position,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            fov: FOV_MAX,
            speed: default_speed,
            sensitivity: config.sensitivity,
            first_sample: true,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            home: config.start_position,
            default_speed,
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn awaiting_first_sample(&self) -> bool {
        self.first_sample
    }

    /// Discard the next pointer delta. Used whenever the pointer is re-captured.
    pub fn rearm_first_sample(&mut self) {
        self.first_sample = true;
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.position += self.front * self.speed * dt;
    }

    pub fn move_backward(&mut self, dt: f32) {
        self.position -= self.front * self.speed * dt;
    }

    pub fn move_left(&mut self, dt: f32) {
        self.position -= self.right * self.speed * dt;
    }

    pub fn move_right(&mut self, dt: f32) {
        self.position += self.right * self.speed * dt;
    }

    pub fn move_up(&mut self, dt: f32) {
        self.position += self.up * self.speed * dt;
    }

    pub fn move_down(&mut self, dt: f32) {
        self.position -= self.up * self.speed * dt;
    }

    pub fn increase_speed(&mut self, step: f32) {
        self.speed += step.max(0.0);
    }

    pub fn decrease_speed(&mut self, step: f32) {
        self.speed = (self.speed - step.max(0.0)).max(MIN_SPEED);
    }

    /// Apply a raw pointer delta in pixels (screen y grows downward).
    pub fn apply_look_delta(&mut self, dx: f32, dy: f32) {
        if self.first_sample {
            self.first_sample = false;
            return;
        }
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scroll zoom: positive scroll narrows the field of view.
    pub fn apply_zoom(&mut self, scroll: f32) {
        if scroll.is_finite() {
            self.fov = (self.fov - scroll).clamp(FOV_MIN, FOV_MAX);
        }
    }

    pub fn reset(&mut self) {
        self.position = self.home;
        self.yaw = DEFAULT_YAW;
        self.pitch = 0.0;
        self.fov = FOV_MAX;
        self.speed = self.default_speed;
        self.first_sample = true;
        self.update_vectors();
    }

    /// Re-derive yaw/pitch so the camera faces `target`.
    ///
    /// The result depends only on `position` and `target`, so calling it
    /// every frame never accumulates drift. A target at the camera position
    /// has no direction and leaves the orientation untouched.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(dir) = (target - self.position).try_normalize() else {
            return;
        };
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            aspect.max(0.01),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(cam: &Camera) {
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!(f.dot(r).abs() < EPS, "front.right = {}", f.dot(r));
        assert!(f.dot(u).abs() < EPS, "front.up = {}", f.dot(u));
        assert!(r.dot(u).abs() < EPS, "right.up = {}", r.dot(u));
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < EPS);
        }
    }

    fn active(cam: &mut Camera) {
        // Consume the first-sample guard so deltas apply.
        cam.apply_look_delta(0.0, 0.0);
    }

    #[test]
    fn initial_pose_faces_negative_z() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert_orthonormal(&cam);
    }

    #[test]
    fn forward_one_second_at_default_speed() {
        let mut cam = Camera::default();
        cam.move_forward(1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-4));
    }

    #[test]
    fn strafing_and_vertical_movement() {
        let mut cam = Camera::default();
        cam.move_right(0.5);
        assert!(cam.position.abs_diff_eq(Vec3::new(1.0, 0.0, 3.0), 1e-4));
        cam.move_left(0.5);
        cam.move_up(1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 2.0, 3.0), 1e-4));
        cam.move_down(1.0);
        cam.move_backward(1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
    }

    #[test]
    fn first_look_delta_is_swallowed() {
        let mut cam = Camera::default();
        assert!(cam.awaiting_first_sample());
        cam.apply_look_delta(500.0, 300.0);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert!(!cam.awaiting_first_sample());

        cam.apply_look_delta(10.0, 0.0);
        assert!((cam.yaw() - -89.0).abs() < EPS);
    }

    #[test]
    fn pitch_is_clamped_for_any_delta() {
        let mut cam = Camera::default();
        active(&mut cam);
        for dy in [-1.0e6, -900.0, -3.0, 0.5, 17.0, 2_000.0, 1.0e7] {
            cam.apply_look_delta(13.0, dy);
            assert!(cam.pitch() >= -PITCH_LIMIT && cam.pitch() <= PITCH_LIMIT);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn moving_pointer_up_raises_pitch() {
        let mut cam = Camera::default();
        active(&mut cam);
        cam.apply_look_delta(0.0, -100.0);
        assert!((cam.pitch() - 10.0).abs() < EPS);
        assert!(cam.front().y > 0.0);
    }

    #[test]
    fn fov_is_clamped() {
        let mut cam = Camera::default();
        cam.apply_zoom(10.0);
        assert!((cam.fov() - 35.0).abs() < EPS);
        cam.apply_zoom(60.0);
        assert_eq!(cam.fov(), FOV_MIN);
        cam.apply_zoom(-500.0);
        assert_eq!(cam.fov(), FOV_MAX);
    }

    #[test]
    fn scroll_of_sixty_from_default_clamps_to_one() {
        let mut cam = Camera::default();
        cam.apply_zoom(60.0);
        assert_eq!(cam.fov(), 1.0);
    }

    #[test]
    fn speed_never_drops_below_floor() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.decrease_speed(0.25);
            assert!(cam.speed() >= MIN_SPEED);
        }
        cam.increase_speed(0.25);
        assert!((cam.speed() - 0.5).abs() < EPS);

        let mut odd = Camera::default();
        odd.increase_speed(0.05);
        for _ in 0..10 {
            odd.decrease_speed(0.25);
        }
        assert_eq!(odd.speed(), MIN_SPEED);
    }

    #[test]
    fn reset_restores_canonical_pose() {
        let mut cam = Camera::default();
        active(&mut cam);
        cam.move_forward(3.0);
        cam.move_up(2.0);
        cam.apply_look_delta(250.0, -120.0);
        cam.apply_zoom(20.0);
        cam.increase_speed(3.0);

        cam.reset();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.fov(), 45.0);
        assert_eq!(cam.speed(), 2.0);
        assert!(cam.awaiting_first_sample());
        assert_orthonormal(&cam);
    }

    #[test]
    fn look_at_points_view_forward_axis_at_target() {
        let targets = [
            Vec3::ZERO,
            Vec3::new(4.0, 1.0, -2.0),
            Vec3::new(-7.0, -3.0, 8.0),
            Vec3::new(0.5, 2.5, 3.0),
        ];
        for target in targets {
            let mut cam = Camera::default();
            cam.position = Vec3::new(10.0, 10.0, 13.0);
            cam.look_at(target);
            let view = cam.view_matrix();
            // Row 2 of a right-handed view matrix is -forward.
            let forward = -view.row(2).truncate();
            let expected = (target - cam.position).normalize();
            assert!(
                forward.abs_diff_eq(expected, 1e-4),
                "forward {forward} expected {expected}"
            );
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn look_at_is_idempotent() {
        let mut cam = Camera::default();
        cam.position = Vec3::new(10.0, 10.0, 13.0);
        let target = Vec3::new(0.0, 0.0, 3.0);
        cam.look_at(target);
        let first = cam.clone();
        cam.look_at(target);
        assert_eq!(cam, first);
    }

    #[test]
    fn look_at_straight_up_clamps_pitch() {
        let mut cam = Camera::default();
        cam.look_at(cam.position + Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_orthonormal(&cam);
    }

    #[test]
    fn look_at_own_position_is_ignored() {
        let mut cam = Camera::default();
        let before = cam.clone();
        cam.look_at(cam.position);
        assert_eq!(cam, before);
    }

    #[test]
    fn projection_is_finite() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(800.0 / 600.0);
        assert!(proj.is_finite());
        assert!(cam.projection_matrix(0.0).is_finite());
    }
}
