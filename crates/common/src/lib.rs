//! Shared types for the shellfur renderer: the vertex/mesh ingestion format
//! and the configuration layer.
//!
//! # Invariants
//! - `Vertex` is `#[repr(C)]` and `Pod`; its byte layout is the GPU vertex layout.
//! - Every config field has a default; a loaded config is always validated.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, MeshConfig, ShellConfig, ShellLayerConfig, WindConfig,
    WindowConfig,
};
pub use types::{MAX_BONE_INFLUENCE, Mesh, TextureKind, TextureRef, Vertex};
