//! Translation of renderer-agnostic raster state into wgpu pipeline state.

use shellfur_render::{Blend, FillMode, RasterState};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub fn primitive_state(state: &RasterState) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: state.cull_back_faces.then_some(wgpu::Face::Back),
        polygon_mode: match state.fill {
            FillMode::Fill => wgpu::PolygonMode::Fill,
            FillMode::Line => wgpu::PolygonMode::Line,
        },
        ..Default::default()
    }
}

pub fn depth_stencil_state(state: &RasterState) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: state.depth_write,
        depth_compare: if state.depth_test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: Default::default(),
        bias: Default::default(),
    }
}

pub fn blend_state(blend: Blend) -> wgpu::BlendState {
    match blend {
        Blend::Replace => wgpu::BlendState::REPLACE,
        Blend::SourceOver => {
            let over = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            };
            wgpu::BlendState {
                color: over,
                alpha: over,
            }
        }
    }
}

/// Everything that differs between pipelines built from the same shader.
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub vs_entry: &'a str,
    pub fs_entry: &'a str,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub state: RasterState,
}

pub fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    spec: &PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some(spec.vs_entry),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend_state(spec.state.blend)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: primitive_state(&spec.state),
        depth_stencil: Some(depth_stencil_state(&spec.state)),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
