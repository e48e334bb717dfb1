//! CPU mirrors of the WGSL `Frame` uniform. Every `vec3` is followed by a
//! scalar or explicit padding so the byte layout matches WGSL alignment.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use shellfur_render::{
    DirectionalLight, FrameView, LayerParams, POINT_LIGHT_COUNT, PointLight, SpotLight,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub time: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DirLightUniform {
    pub direction: [f32; 3],
    _pad0: f32,
    pub ambient: [f32; 3],
    _pad1: f32,
    pub diffuse: [f32; 3],
    _pad2: f32,
    pub specular: [f32; 3],
    _pad3: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub ambient: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    _pad: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub direction: [f32; 3],
    pub linear: f32,
    pub ambient: [f32; 3],
    pub quadratic: f32,
    pub diffuse: [f32; 3],
    pub cut_off: f32,
    pub specular: [f32; 3],
    pub outer_cut_off: f32,
    pub enabled: u32,
    _pad: [u32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ShellUniform {
    pub base_color: [f32; 3],
    pub num_layers: u32,
    pub wind_direction: [f32; 3],
    pub fur_length: f32,
    pub gravity: [f32; 3],
    pub strand_thickness: f32,
    pub grid_frequency: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub globals: GlobalsUniform,
    pub dir_light: DirLightUniform,
    pub point_lights: [PointLightUniform; POINT_LIGHT_COUNT],
    pub spot_light: SpotLightUniform,
    pub shell: ShellUniform,
}

fn arr(v: Vec3) -> [f32; 3] {
    v.to_array()
}

impl From<&DirectionalLight> for DirLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: arr(light.direction),
            ambient: arr(light.ambient),
            diffuse: arr(light.diffuse),
            specular: arr(light.specular),
            ..Zeroable::zeroed()
        }
    }
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: arr(light.position),
            constant: light.attenuation.constant,
            ambient: arr(light.ambient),
            linear: light.attenuation.linear,
            diffuse: arr(light.diffuse),
            quadratic: light.attenuation.quadratic,
            specular: arr(light.specular),
            _pad: 0.0,
        }
    }
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: arr(light.position),
            constant: light.attenuation.constant,
            direction: arr(light.direction),
            linear: light.attenuation.linear,
            ambient: arr(light.ambient),
            quadratic: light.attenuation.quadratic,
            diffuse: arr(light.diffuse),
            cut_off: light.cut_off,
            specular: arr(light.specular),
            outer_cut_off: light.outer_cut_off,
            enabled: u32::from(light.enabled),
            _pad: [0; 3],
        }
    }
}

impl From<&LayerParams> for ShellUniform {
    fn from(params: &LayerParams) -> Self {
        Self {
            base_color: arr(params.base_color),
            num_layers: params.layer_count,
            wind_direction: arr(params.wind),
            fur_length: params.fur_length,
            gravity: arr(params.gravity),
            strand_thickness: params.strand_thickness,
            grid_frequency: params.grid_frequency,
            _pad: [0.0; 3],
        }
    }
}

impl FrameUniforms {
    pub fn from_view(frame: &FrameView) -> Self {
        Self {
            globals: GlobalsUniform {
                model: frame.model.to_cols_array_2d(),
                view: frame.view.to_cols_array_2d(),
                projection: frame.projection.to_cols_array_2d(),
                view_position: arr(frame.view_position),
                time: frame.time,
            },
            dir_light: (&frame.lights.directional).into(),
            point_lights: std::array::from_fn(|i| (&frame.lights.points[i]).into()),
            spot_light: (&frame.lights.spot).into(),
            shell: (&frame.layers).into(),
        }
    }
}

/// Per-instance data of a light marker cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MarkerInstance {
    /// xyz position, w uniform scale.
    pub position_scale: [f32; 4],
    pub color: [f32; 4],
}

impl MarkerInstance {
    pub const SCALE: f32 = 0.2;

    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position_scale: position.extend(Self::SCALE).to_array(),
            color: color.extend(1.0).to_array(),
        }
    }
}
