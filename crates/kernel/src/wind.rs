use glam::Vec3;
use shellfur_common::WindConfig;

/// Frame steps at or below this are treated as "no time passed".
pub const MIN_DT: f32 = 1e-6;

/// Derives a smoothed, magnitude-capped wind vector from camera motion.
///
/// The wind opposes the observer's velocity, so fur trails behind a moving
/// camera and settles back to the ambient breeze when it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSimulator {
    wind: Vec3,
    previous_position: Vec3,
    smoothing: f32,
    max_strength: f32,
    ambient_amplitude: Vec3,
    ambient_frequency: Vec3,
}

impl WindSimulator {
    /// `start` seeds the previous position so the first frame sees no jump.
    pub fn new(config: &WindConfig, start: Vec3) -> Self {
        Self {
            wind: Vec3::ZERO,
            previous_position: start,
            smoothing: config.smoothing.clamp(0.0, 1.0),
            max_strength: config.max_strength.max(0.0),
            ambient_amplitude: config.ambient_amplitude,
            ambient_frequency: config.ambient_frequency,
        }
    }

    /// Advance one frame with the observer now at `position`.
    ///
    /// Degenerate steps (`dt <= MIN_DT`) leave the wind untouched but still
    /// record the position.
    pub fn update(&mut self, position: Vec3, dt: f32) -> Vec3 {
        if dt > MIN_DT {
            let velocity = (position - self.previous_position) / dt;
            let target = -velocity;
            if target.is_finite() {
                self.wind = target
                    .lerp(self.wind, self.smoothing)
                    .clamp_length_max(self.max_strength);
            }
        }
        self.previous_position = position;
        self.wind
    }

    /// Motion-induced wind after the last update.
    pub fn wind(&self) -> Vec3 {
        self.wind
    }

    pub fn max_strength(&self) -> f32 {
        self.max_strength
    }

    pub fn set_max_strength(&mut self, max_strength: f32) {
        self.max_strength = max_strength.max(0.0);
        self.wind = self.wind.clamp_length_max(self.max_strength);
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 1.0);
    }

    /// Resting breeze at `time` seconds.
    pub fn ambient(&self, time: f32) -> Vec3 {
        let phase = self.ambient_frequency * time;
        Vec3::new(
            phase.x.sin() * self.ambient_amplitude.x,
            phase.y.sin() * self.ambient_amplitude.y,
            phase.z.cos() * self.ambient_amplitude.z,
        )
    }

    /// Wind handed to the shell shader: motion wind plus the ambient breeze.
    pub fn total(&self, time: f32) -> Vec3 {
        self.wind + self.ambient(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn sim() -> WindSimulator {
        WindSimulator::new(&WindConfig::default(), Vec3::ZERO)
    }

    #[test]
    fn first_step_from_rest() {
        let mut wind = sim();
        let w = wind.update(Vec3::new(0.1, 0.0, 0.0), 0.1);
        // velocity (1,0,0), target (-1,0,0), lerp weight 0.9 on old zero.
        assert!(w.abs_diff_eq(Vec3::new(-0.1, 0.0, 0.0), EPS), "{w}");
    }

    #[test]
    fn stationary_camera_decays_geometrically() {
        let mut wind = sim();
        wind.update(Vec3::new(0.1, 0.0, 0.0), 0.1);
        let mut expected = wind.wind();
        for _ in 0..20 {
            let w = wind.update(Vec3::new(0.1, 0.0, 0.0), 0.016);
            expected *= 0.9;
            assert!(w.abs_diff_eq(expected, EPS), "{w} vs {expected}");
        }
    }

    #[test]
    fn magnitude_never_exceeds_cap() {
        let mut wind = sim();
        let mut pos = Vec3::ZERO;
        for i in 0..200 {
            pos += Vec3::new(50.0, (i as f32).sin() * 30.0, -20.0);
            let w = wind.update(pos, 0.016);
            assert!(w.length() <= 2.0 + EPS, "{}", w.length());
        }
    }

    #[test]
    fn zero_dt_keeps_wind_but_records_position() {
        let mut wind = sim();
        wind.update(Vec3::new(0.1, 0.0, 0.0), 0.1);
        let before = wind.wind();
        let w = wind.update(Vec3::new(5.0, 0.0, 0.0), 0.0);
        assert_eq!(w, before);
        assert!(w.is_finite());

        // Standing still at the recorded position only decays the history.
        let w = wind.update(Vec3::new(5.0, 0.0, 0.0), 0.1);
        assert!(w.abs_diff_eq(before * 0.9, EPS), "{w}");
    }

    #[test]
    fn tiny_dt_does_not_produce_nan() {
        let mut wind = sim();
        let w = wind.update(Vec3::new(1.0, 0.0, 0.0), 1e-9);
        assert!(w.is_finite());
        assert_eq!(w, Vec3::ZERO);
    }

    #[test]
    fn seeded_start_position_means_no_initial_gust() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        let mut wind = WindSimulator::new(&WindConfig::default(), start);
        assert_eq!(wind.update(start, 0.016), Vec3::ZERO);
    }

    #[test]
    fn ambient_breeze_follows_time() {
        let wind = sim();
        assert!(wind.ambient(0.0).abs_diff_eq(Vec3::ZERO, EPS));
        let t = std::f32::consts::PI; // sin(0.5 * pi) = 1
        assert!(wind.ambient(t).abs_diff_eq(Vec3::new(0.3, 0.0, 0.0), EPS));
        assert!(wind.total(t).abs_diff_eq(wind.wind() + wind.ambient(t), EPS));
    }

    #[test]
    fn lowering_cap_clamps_current_wind() {
        let mut wind = sim();
        let mut p = Vec3::ZERO;
        for _ in 0..50 {
            p += Vec3::new(1.0, 0.0, 0.0);
            wind.update(p, 0.01);
        }
        wind.set_max_strength(0.5);
        assert!(wind.wind().length() <= 0.5 + EPS);
    }
}
