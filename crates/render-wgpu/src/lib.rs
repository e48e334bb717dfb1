//! wgpu render backend for the shell-texturing renderer.
//!
//! Draws the mesh once per shell layer in a single instanced draw, then the
//! opaque light marker cubes, both inside the letterboxed viewport.
//!
//! # Invariants
//! - The renderer only reads a captured `FrameView`; it never touches the scene.
//! - Pipelines are built from `RasterState` values, so the shell pass never
//!   writes depth and the marker pass always does.

mod context;
mod gpu;
pub mod pipelines;
mod shaders;
mod texture;
pub mod uniforms;

pub use context::{GpuContext, RenderInitError};
pub use gpu::{CLEAR_COLOR, ShellRenderer};
pub use texture::GpuTexture;
pub use uniforms::FrameUniforms;
