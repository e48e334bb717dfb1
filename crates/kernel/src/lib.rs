//! Kernel: the mutable application state of the renderer and the per-frame
//! step that advances it.
//!
//! # Invariants
//! - Camera orientation is owned by yaw/pitch; the basis is always derived.
//! - All state mutations flow through [`Scene::step`] or explicit tuning setters.
//! - Wind magnitude never exceeds the configured maximum.

pub mod camera;
pub mod clock;
pub mod scene;
pub mod wind;

pub use camera::Camera;
pub use clock::{FpsCounter, FrameClock, fps_title};
pub use scene::{Modes, Scene, StepOutcome};
pub use wind::WindSimulator;
