use crate::layers::LayerParams;
use crate::lighting::{LightBlocks, LightingState};
use crate::raster::FramePlan;
use crate::viewport::Viewport;
use glam::{Mat4, Vec3};
use serde::Serialize;
use shellfur_kernel::{Modes, Scene};

/// Everything a backend needs to draw one frame, captured from the scene.
///
/// Backends only ever see this; they cannot reach back into the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub frame: u64,
    pub time: f32,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_position: Vec3,
    pub fov_degrees: f32,
    pub layers: LayerParams,
    pub lights: LightBlocks,
    pub modes: Modes,
    pub viewport: Viewport,
    pub plan: FramePlan,
}

impl FrameView {
    /// Capture the active camera, light blocks and shell parameters.
    ///
    /// The projection keeps the viewport aspect, which the letterboxing
    /// holds at the design aspect.
    pub fn capture(scene: &Scene, lighting: &LightingState, viewport: Viewport) -> Self {
        let camera = scene.active_camera();
        let layers = LayerParams::derive(scene.shell(), scene.wind_total());
        let modes = scene.modes();
        let marker_count = lighting.markers().count() as u32;
        Self {
            frame: scene.frame(),
            time: scene.elapsed(),
            model: Mat4::IDENTITY,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(viewport.aspect()),
            view_position: camera.position,
            fov_degrees: camera.fov(),
            layers,
            lights: lighting.blocks(scene),
            modes,
            viewport,
            plan: FramePlan::new(layers.layer_count, modes.wireframe, marker_count),
        }
    }
}
