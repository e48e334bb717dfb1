use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`ShellConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level renderer configuration. Every field has a default, so a config
/// file only needs to name the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shell: ShellLayerConfig,
    pub wind: WindConfig,
    pub mesh: MeshConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Design resolution. Its aspect ratio is preserved on resize.
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Shell Texturing".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: Vec3,
    pub speed: f32,
    pub sensitivity: f32,
    /// Amount added or removed per frame while a speed key is held.
    pub speed_step: f32,
    /// Where the spectator camera sits relative to the player while following.
    pub debug_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 0.0, 3.0),
            speed: 2.0,
            sensitivity: 0.1,
            speed_step: 0.25,
            debug_offset: Vec3::splat(10.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellLayerConfig {
    /// Instance count of the shell draw. Fixed for the lifetime of the renderer.
    pub layers: u32,
    pub fur_length: f32,
    pub strand_thickness: f32,
    pub grid_frequency: f32,
    pub base_color: Vec3,
    pub gravity: Vec3,
}

impl Default for ShellLayerConfig {
    fn default() -> Self {
        Self {
            layers: 80,
            fur_length: 0.15,
            strand_thickness: 0.9,
            grid_frequency: 1500.0,
            base_color: Vec3::new(0.8, 0.7, 0.6),
            gravity: Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Weight kept from the previous wind sample each frame.
    pub smoothing: f32,
    pub max_strength: f32,
    /// Per-axis amplitude of the resting breeze (x uses sin, z uses cos).
    pub ambient_amplitude: Vec3,
    /// Per-axis angular frequency of the resting breeze.
    pub ambient_frequency: Vec3,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.9,
            max_strength: 2.0,
            ambient_amplitude: Vec3::new(0.3, 0.0, 0.0),
            ambient_frequency: Vec3::new(0.5, 0.0, 0.7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub sphere_radius: f32,
    pub sphere_stacks: u32,
    pub sphere_slices: u32,
    /// OBJ model to grow fur on instead of the procedural sphere.
    pub model: Option<String>,
    /// Base texture; falls back to the model's diffuse map, then plain white.
    pub texture: Option<String>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 1.0,
            sphere_stacks: 32,
            sphere_slices: 32,
            model: None,
            texture: None,
        }
    }
}

impl ShellConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.layers == 0 {
            return Err(ConfigError::Invalid("shell.layers must be at least 1".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window design size {}x{} has zero area",
                self.window.width, self.window.height
            )));
        }
        if self.mesh.sphere_stacks < 2 || self.mesh.sphere_slices < 3 {
            return Err(ConfigError::Invalid(format!(
                "sphere needs at least 2 stacks and 3 slices, got {}x{}",
                self.mesh.sphere_stacks, self.mesh.sphere_slices
            )));
        }
        if !(0.0..1.0).contains(&self.wind.smoothing) {
            return Err(ConfigError::Invalid(format!(
                "wind.smoothing must be in [0, 1), got {}",
                self.wind.smoothing
            )));
        }
        if self.wind.max_strength < 0.0 {
            return Err(ConfigError::Invalid("wind.max_strength is negative".into()));
        }
        Ok(())
    }
}
