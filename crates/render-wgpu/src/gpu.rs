use crate::pipelines::{DEPTH_FORMAT, PipelineSpec, create_pipeline};
use crate::shaders;
use crate::texture::GpuTexture;
use crate::uniforms::{FrameUniforms, MarkerInstance};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use shellfur_assets::TextureData;
use shellfur_common::{Mesh, Vertex};
use shellfur_render::{DrawKind, FillMode, FrameView, RasterState};
use wgpu::util::DeviceExt;

/// Background behind the scene and in the letterbox bars.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.2,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CubeVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Unit cube vertices and indices for the light markers.
fn cube_mesh() -> (Vec<CubeVertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        CubeVertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        CubeVertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        CubeVertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        CubeVertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        CubeVertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        CubeVertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        CubeVertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        CubeVertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        CubeVertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        CubeVertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        CubeVertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        CubeVertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        CubeVertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        CubeVertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        CubeVertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        CubeVertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        CubeVertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        CubeVertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        CubeVertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        CubeVertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        CubeVertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        CubeVertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        CubeVertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        CubeVertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Vertex layout of the shell pass: position, normal and UV of the shared
/// [`Vertex`]; tangent and bone data are skipped by the stride.
fn shell_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// wgpu renderer for the shell-textured mesh and its light markers.
pub struct ShellRenderer {
    shell_pipeline: wgpu::RenderPipeline,
    shell_wire_pipeline: Option<wgpu::RenderPipeline>,
    marker_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    mesh_vertex_buffer: wgpu::Buffer,
    mesh_index_buffer: wgpu::Buffer,
    mesh_index_count: u32,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    marker_buffer: wgpu::Buffer,
    marker_count: u32,
    depth_texture: wgpu::TextureView,
}

impl ShellRenderer {
    /// Build pipelines and upload the mesh, base texture and marker cubes.
    ///
    /// `wireframe` requests the line-mode shell pipeline; the device must
    /// have been created with `Features::POLYGON_MODE_LINE`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        mesh: &Mesh,
        texture: &TextureData,
        markers: impl IntoIterator<Item = (Vec3, Vec3)>,
        wireframe: bool,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&<FrameUniforms as Zeroable>::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let base = GpuTexture::upload(device, queue, texture);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&base.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&base.sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shell_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shell_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHELL_SHADER.into()),
        });
        let shell_buffers = [shell_vertex_layout()];
        let shell_spec = |label: &'static str, state: RasterState| PipelineSpec {
            label,
            shader: &shell_shader,
            vs_entry: "vs_shell",
            fs_entry: "fs_shell",
            buffers: &shell_buffers,
            state,
        };
        let shell_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            &shell_spec("shell_pipeline", RasterState::SHELL),
        );
        let shell_wire_pipeline = wireframe.then(|| {
            create_pipeline(
                device,
                &pipeline_layout,
                surface_format,
                &shell_spec(
                    "shell_wire_pipeline",
                    RasterState::SHELL.with_fill(FillMode::Line),
                ),
            )
        });

        let marker_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MARKER_SHADER.into()),
        });
        let marker_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CubeVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MarkerInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    3 => Float32x4,
                    4 => Float32x4,
                ],
            },
        ];
        let marker_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            &PipelineSpec {
                label: "marker_pipeline",
                shader: &marker_shader,
                vs_entry: "vs_marker",
                fs_entry: "fs_marker",
                buffers: &marker_buffers,
                state: RasterState::OPAQUE,
            },
        );

        let mesh_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances: Vec<MarkerInstance> = markers
            .into_iter()
            .map(|(position, color)| MarkerInstance::new(position, color))
            .collect();
        // Keep the buffer non-empty so it can always be bound.
        let marker_contents = if instances.is_empty() {
            vec![<MarkerInstance as Zeroable>::zeroed()]
        } else {
            instances.clone()
        };
        let marker_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_instance_buffer"),
            contents: bytemuck::cast_slice(&marker_contents),
            usage: wgpu::BufferUsages::VERTEX,
        });

        tracing::info!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            markers = instances.len(),
            wireframe,
            "shell renderer ready"
        );

        Self {
            shell_pipeline,
            shell_wire_pipeline,
            marker_pipeline,
            uniform_buffer,
            bind_group,
            mesh_vertex_buffer,
            mesh_index_buffer,
            mesh_index_count: mesh.indices.len() as u32,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            marker_buffer,
            marker_count: instances.len() as u32,
            depth_texture: Self::create_depth_texture(device, size.0, size.1),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: every step of the frame plan, in order, inside the
    /// letterboxed viewport.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameView,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::from_view(frame)),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("shell_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shell_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let vp = frame.viewport;
            pass.set_viewport(
                vp.x as f32,
                vp.y as f32,
                vp.width as f32,
                vp.height as f32,
                0.0,
                1.0,
            );
            pass.set_bind_group(0, &self.bind_group, &[]);

            for step in &frame.plan.steps {
                match step.kind {
                    DrawKind::ShellLayers { instances } => {
                        let pipeline = match (step.state.fill, &self.shell_wire_pipeline) {
                            (FillMode::Line, Some(wire)) => wire,
                            _ => &self.shell_pipeline,
                        };
                        pass.set_pipeline(pipeline);
                        pass.set_vertex_buffer(0, self.mesh_vertex_buffer.slice(..));
                        pass.set_index_buffer(
                            self.mesh_index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..self.mesh_index_count, 0, 0..instances);
                    }
                    DrawKind::LightMarkers { instances } => {
                        let count = instances.min(self.marker_count);
                        if count == 0 {
                            continue;
                        }
                        pass.set_pipeline(&self.marker_pipeline);
                        pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                        pass.set_vertex_buffer(1, self.marker_buffer.slice(..));
                        pass.set_index_buffer(
                            self.cube_index_buffer.slice(..),
                            wgpu::IndexFormat::Uint16,
                        );
                        pass.draw_indexed(0..self.cube_index_count, 0, 0..count);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
