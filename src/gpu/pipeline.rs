//! Render pipeline construction: the "linked program" for a mesh draw.

use wgpu::util::DeviceExt;

use super::render_context::RenderContext;
use super::shader::CompiledShader;
use super::DEPTH_FORMAT;
use crate::mesh::Vertex;

/// Per-draw uniform block. Every pipeline exposes the same block: model,
/// view, and projection matrices plus wall-clock time (for time-varying
/// equations). All four are written on every draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    /// Model transform.
    pub model: [[f32; 4]; 4],
    /// View transform (camera xform, inverted).
    pub view: [[f32; 4]; 4],
    /// Projection transform.
    pub proj: [[f32; 4]; 4],
    /// Wall-clock seconds.
    pub time: f32,
    /// Padding for GPU struct alignment.
    pub _pad: [f32; 3],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            proj: identity,
            time: 0.0,
            _pad: [0.0; 3],
        }
    }
}

/// A linked render pipeline plus the uniform buffer and bind group feeding
/// it. Construction requires a shader that already validated on the CPU,
/// so pipeline creation itself does not fail.
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshPipeline {
    /// Build a pipeline for the packed [`Vertex`] layout (slot 0 position,
    /// slot 1 coordinate pair) targeting the context's surface format with
    /// depth testing. Culling stays disabled so surfaces read from both
    /// sides.
    #[must_use]
    pub fn new(
        gpu: &RenderContext,
        shader: &CompiledShader,
        label: &str,
    ) -> Self {
        let device = &gpu.device;
        let module = shader.create_module(device, label);

        let uniforms =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Draw Uniforms"),
                contents: bytemuck::bytes_of(&DrawUniforms::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let bind_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Uniforms Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Draw Uniforms Bind Group"),
                layout: &bind_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[&bind_layout],
                push_constant_ranges: &[],
            },
        );

        let pipeline = device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        Self {
            pipeline,
            uniforms,
            bind_group,
        }
    }

    /// Write the per-draw uniform block.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &DrawUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Bind this pipeline and its uniforms into an open render pass.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}
