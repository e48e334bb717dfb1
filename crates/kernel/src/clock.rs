use std::time::{Duration, Instant};

/// Upper bound on a single frame step, so a stall (window drag, breakpoint)
/// does not fling the camera across the scene.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Measures the time between successive frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DT]`.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.clamp(0.0, MAX_FRAME_DT)
    }
}

/// Counts frames and reports a rate once per second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    latest: Option<u32>,
}

impl FpsCounter {
    pub const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            latest: None,
        }
    }

    /// Record one frame. Returns the frame rate when a full window has elapsed.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Self::WINDOW {
            return None;
        }
        let fps = (self.frames as f64 / elapsed.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.window_start = now;
        self.latest = Some(fps);
        self.latest
    }

    /// Most recent reported rate, if a window has completed.
    pub fn latest(&self) -> Option<u32> {
        self.latest
    }
}

/// Window title carrying the frame rate.
pub fn fps_title(base: &str, fps: u32) -> String {
    format!("{base} | FPS: {fps}")
}
