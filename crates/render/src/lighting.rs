use glam::Vec3;
use serde::Serialize;
use shellfur_kernel::Scene;

pub const POINT_LIGHT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Roughly a 50 unit falloff range.
    pub const RANGE_50: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub attenuation: Attenuation,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub attenuation: Attenuation,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Cosine of the inner cone half-angle.
    pub cut_off: f32,
    /// Cosine of the outer cone half-angle; `outer_cut_off <= cut_off`.
    pub outer_cut_off: f32,
    pub enabled: bool,
}

/// Light data for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightBlocks {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
}

/// Fixed light layout of the scene. Only the flashlight moves.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingState {
    pub directional: DirectionalLight,
    pub point_positions: [Vec3; POINT_LIGHT_COUNT],
    pub point_colors: [Vec3; POINT_LIGHT_COUNT],
    pub point_attenuation: Attenuation,
    pub spot_inner_degrees: f32,
    pub spot_outer_degrees: f32,
}

impl Default for LightingState {
    fn default() -> Self {
        let diffuse = Vec3::splat(0.4);
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.3),
                ambient: diffuse * 0.05,
                diffuse,
                specular: Vec3::splat(0.5),
            },
            point_positions: [
                Vec3::new(0.7, 0.2, 2.0),
                Vec3::new(2.3, 3.3, -4.0),
                Vec3::new(-4.0, 2.0, -12.0),
                Vec3::new(0.0, 0.0, -3.0),
            ],
            point_colors: [
                Vec3::new(1.0, 0.6, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.2, 0.2, 1.0),
            ],
            point_attenuation: Attenuation::RANGE_50,
            spot_inner_degrees: 12.5,
            spot_outer_degrees: 17.5,
        }
    }
}

impl LightingState {
    /// Build this frame's light blocks.
    ///
    /// The flashlight is mounted on the player camera even while the
    /// spectator camera is active.
    pub fn blocks(&self, scene: &Scene) -> LightBlocks {
        let player = scene.camera();
        let points = std::array::from_fn(|i| {
            let color = self.point_colors[i];
            let diffuse = color * 0.4;
            PointLight {
                position: self.point_positions[i],
                attenuation: self.point_attenuation,
                ambient: diffuse * 0.05,
                diffuse,
                specular: color,
            }
        });
        LightBlocks {
            directional: self.directional,
            points,
            spot: SpotLight {
                position: player.position,
                direction: player.front(),
                attenuation: Attenuation::RANGE_50,
                ambient: Vec3::ZERO,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                cut_off: self.spot_inner_degrees.to_radians().cos(),
                outer_cut_off: self.spot_outer_degrees.to_radians().cos(),
                enabled: scene.modes().flashlight,
            },
        }
    }

    /// Colored marker positions, one per point light.
    pub fn markers(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.point_positions
            .iter()
            .copied()
            .zip(self.point_colors.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellfur_common::ShellConfig;
    use shellfur_input::{Action, InputSnapshot};

    #[test]
    fn directional_light_matches_scene_setup() {
        let blocks = LightingState::default().blocks(&Scene::new(&ShellConfig::default()));
        let dir = blocks.directional;
        assert_eq!(dir.direction, Vec3::new(-0.2, -1.0, -0.3));
        assert!(dir.diffuse.abs_diff_eq(Vec3::splat(0.4), 1e-6));
        assert!(dir.ambient.abs_diff_eq(Vec3::splat(0.02), 1e-6));
        assert_eq!(dir.specular, Vec3::splat(0.5));
    }

    #[test]
    fn spot_follows_player_and_flashlight_toggle() {
        let mut scene = Scene::new(&ShellConfig::default());
        let lighting = LightingState::default();
        let spot = lighting.blocks(&scene).spot;
        assert!(!spot.enabled);
        assert_eq!(spot.position, scene.camera().position);
        assert_eq!(spot.direction, scene.camera().front());
        assert!(spot.outer_cut_off < spot.cut_off);
        assert!((spot.cut_off - 12.5f32.to_radians().cos()).abs() < 1e-6);

        let mut flash = InputSnapshot::new();
        flash.press(Action::ToggleFlashlight);
        scene.step(&InputSnapshot::new(), &flash, 0.016);
        assert!(lighting.blocks(&scene).spot.enabled);
    }

    #[test]
    fn spot_stays_on_player_with_debug_camera() {
        let mut scene = Scene::new(&ShellConfig::default());
        let mut toggle = InputSnapshot::new();
        toggle.press(Action::ToggleDebugCamera);
        scene.step(&InputSnapshot::new(), &toggle, 0.016);
        let mut up = InputSnapshot::new();
        up.press(Action::MoveUp);
        scene.step(&toggle, &up, 0.1);

        let spot = LightingState::default().blocks(&scene).spot;
        assert_eq!(spot.position, scene.camera().position);
        assert_ne!(spot.position, scene.active_camera().position);
    }

    #[test]
    fn four_colored_point_lights() {
        let lighting = LightingState::default();
        let blocks = lighting.blocks(&Scene::new(&ShellConfig::default()));
        assert_eq!(blocks.points.len(), POINT_LIGHT_COUNT);
        assert!(blocks.points[1].diffuse.abs_diff_eq(Vec3::new(0.4, 0.0, 0.0), 1e-6));
        assert_eq!(blocks.points[2].position, Vec3::new(-4.0, 2.0, -12.0));
        assert_eq!(lighting.markers().count(), POINT_LIGHT_COUNT);
    }
}
