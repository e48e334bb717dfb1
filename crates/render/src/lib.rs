//! Rendering adapter: the renderer-agnostic description of a frame.
//!
//! # Invariants
//! - Renderers read a captured [`FrameView`]; they cannot mutate the scene.
//! - Shell layers are drawn translucent with depth writes off; every opaque
//!   draw after them writes depth again.
//! - The viewport always keeps the design aspect ratio.

pub mod frame;
pub mod layers;
pub mod lighting;
pub mod raster;
mod renderer;
pub mod viewport;

pub use frame::FrameView;
pub use layers::LayerParams;
pub use lighting::{
    Attenuation, DirectionalLight, LightBlocks, LightingState, POINT_LIGHT_COUNT, PointLight,
    SpotLight,
};
pub use raster::{Blend, DrawKind, DrawStep, FillMode, FramePlan, RasterState};
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::Viewport;
