use glam::Vec3;
use serde::Serialize;
use shellfur_common::ShellLayerConfig;

/// Everything the shell shader needs for one frame, fixed for the duration
/// of the draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerParams {
    /// Instance count of the shell draw. Always at least 1.
    pub layer_count: u32,
    pub strand_thickness: f32,
    pub fur_length: f32,
    /// Motion wind plus ambient breeze.
    pub wind: Vec3,
    pub gravity: Vec3,
    pub base_color: Vec3,
    pub grid_frequency: f32,
}

impl LayerParams {
    /// Pure per-frame derivation; no GPU state is touched.
    pub fn derive(shell: &ShellLayerConfig, wind: Vec3) -> Self {
        Self {
            layer_count: shell.layers.max(1),
            strand_thickness: shell.strand_thickness,
            fur_length: shell.fur_length,
            wind,
            gravity: shell.gravity,
            base_color: shell.base_color,
            grid_frequency: shell.grid_frequency,
        }
    }

    /// Normalized height `h` of a shell instance.
    pub fn height(&self, layer: u32) -> f32 {
        layer as f32 / self.layer_count as f32
    }

    /// Offset applied to a vertex of `layer`, mirroring the vertex shader:
    /// pushed out along the normal and bent by wind and gravity, the bend
    /// growing with the square of the height.
    pub fn displacement(&self, layer: u32, normal: Vec3) -> Vec3 {
        let h = self.height(layer);
        normal * self.fur_length * h + (self.wind + self.gravity) * self.fur_length * h * h
    }
}
