use std::path::Path;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::mesh::{self, Vertex};
use crate::shader;

use super::depth::{DEPTH_FORMAT, DepthTarget};
use super::error::RenderError;
use super::uniform::{SceneUniforms, ViewParams};

/// The session's single render pipeline and every GPU resource it depends on.
///
/// Built exactly once at startup. The bind group references the uniform
/// buffer and the pipeline's layout, so all three live and die together here.
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth: DepthTarget,
    params: ViewParams,
}

impl MeshPipeline {
    /// Builds the pipeline and its static resources.
    ///
    /// The step order is a correctness requirement: the surface must already
    /// be configured (format and size are inputs here), the depth target must
    /// match the surface size, and the bind group can only be created after
    /// the uniform buffer exists. Any failure aborts the build; nothing
    /// partially constructed escapes.
    pub fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        params: ViewParams,
        shader_path: &Path,
        mesh_path: &Path,
    ) -> Result<Self, RenderError> {
        // Shader module; dropped at the end of the build once the pipeline
        // holds the compiled state.
        let source = shader::load_source(shader_path)?;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lodestone mesh shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lodestone scene bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(SceneUniforms::SIZE),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lodestone mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lodestone mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(standard_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        let depth = DepthTarget::new(device, size);

        // Geometry. A supplier failure or an empty mesh aborts the build
        // before any mesh-dependent GPU object exists.
        let vertices = mesh::load_obj(mesh_path)?;
        log::info!("mesh ready: {} vertices", vertices.len());

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lodestone mesh vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let uniforms = SceneUniforms::initial(&params, aspect);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lodestone scene ubo"),
            size: SceneUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lodestone scene bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
            depth,
            params,
        })
    }

    /// Refreshes the time-varying uniform fields for the given elapsed time.
    ///
    /// Only the model matrix and `time` change per frame; the two partial
    /// writes leave the projection/view/color regions untouched.
    pub fn advance(&self, queue: &wgpu::Queue, elapsed: f32) {
        let model = self.params.model_matrix(elapsed).to_cols_array_2d();
        queue.write_buffer(
            &self.uniform_buffer,
            SceneUniforms::MODEL_OFFSET,
            bytemuck::bytes_of(&model),
        );
        queue.write_buffer(
            &self.uniform_buffer,
            SceneUniforms::TIME_OFFSET,
            bytemuck::bytes_of(&elapsed),
        );
    }

    /// Records the scene's single draw: full vertex range, one instance.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }

    pub fn depth(&self) -> &DepthTarget {
        &self.depth
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Standard alpha blending: src-alpha over on color, keep destination alpha.
fn standard_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
