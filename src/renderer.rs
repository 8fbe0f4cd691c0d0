//! Renderer component: owns a linked pipeline and draws a mesh with it.

use glam::Mat4;

use crate::gpu::pipeline::{DrawUniforms, MeshPipeline};
use crate::gpu::render_context::RenderContext;
use crate::mesh::Mesh;

/// Draws its object's mesh with an owned [`MeshPipeline`].
///
/// Drawing is two-phase to fit the command-encoder model:
/// [`prepare`](Self::prepare) runs before the render pass opens and performs the
/// uniform write plus any pending mesh upload; [`record`](Self::record)
/// binds and issues the indexed draw inside the pass.
pub struct Renderer {
    pipeline: MeshPipeline,
}

impl Renderer {
    /// Create a renderer around a linked pipeline.
    #[must_use]
    pub fn new(pipeline: MeshPipeline) -> Self {
        Self { pipeline }
    }

    /// Swap in a newly linked pipeline (successful shader recompilation).
    /// The previous pipeline is dropped, releasing its GPU objects.
    pub fn set_pipeline(&mut self, pipeline: MeshPipeline) {
        self.pipeline = pipeline;
    }

    /// Write the draw uniforms for this frame and upload the mesh buffers
    /// if they are dirty.
    pub fn prepare(
        &self,
        gpu: &RenderContext,
        mesh: &mut Mesh,
        view: Mat4,
        proj: Mat4,
        time: f32,
    ) {
        let uniforms = DrawUniforms {
            model: mesh.xform.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        };
        self.pipeline.write_uniforms(&gpu.queue, &uniforms);
        mesh.buffers.prepare(gpu, &mesh.vertices, &mesh.indices);
    }

    /// Record the draw call into an open pass. Skips meshes that have
    /// never been uploaded.
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &Mesh) {
        let (Some(vertex), Some(index)) =
            (mesh.buffers.vertex(), mesh.buffers.index())
        else {
            return;
        };
        self.pipeline.bind(pass);
        pass.set_vertex_buffer(0, vertex.slice(..));
        pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.indices.len() as u32 * 3, 0, 0..1);
    }
}
