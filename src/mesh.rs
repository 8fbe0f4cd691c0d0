//! CPU-side geometry component and its vertex formats.

use glam::Mat4;

use crate::gpu::geometry::GeometryBuffers;

/// One packed vertex: position plus texture/parameter coordinate.
///
/// Layout is the vertex attribute contract: slot 0 is the position
/// (3 floats), slot 1 the coordinate pair (2 floats), tightly packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position (surface grids store the parameter pair here as u, -1, v).
    pub position: [f32; 3],
    /// Texture/parameter coordinate.
    pub uv: [f32; 2],
}

/// One triangle as three vertex indices.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Triangle {
    /// Vertex indices, counter-clockwise.
    pub indices: [u32; 3],
}

/// Geometry component: vertex/index data, a model transform, and the GPU
/// buffers backing them.
///
/// Edits replace the arrays wholesale and mark the buffers dirty; the
/// upload happens lazily on the next draw.
pub struct Mesh {
    /// Vertex sequence.
    pub vertices: Vec<Vertex>,
    /// Triangle index sequence.
    pub indices: Vec<Triangle>,
    /// Model transform (the `model` draw uniform).
    pub xform: Mat4,
    /// GPU buffer pair plus dirty flag.
    pub buffers: GeometryBuffers,
}

impl Mesh {
    /// Create a mesh from vertex and index data. Buffers start dirty, so
    /// the first draw uploads.
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<Triangle>) -> Self {
        Self {
            vertices,
            indices,
            xform: Mat4::IDENTITY,
            buffers: GeometryBuffers::new(),
        }
    }

    /// Replace the geometry wholesale and mark the buffers for re-upload.
    pub fn edit(&mut self, vertices: Vec<Vertex>, indices: Vec<Triangle>) {
        self.vertices = vertices;
        self.indices = indices;
        self.buffers.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_marks_buffers_dirty() {
        let mut mesh = Mesh::new(vec![], vec![]);
        assert!(mesh.buffers.is_dirty());

        // Simulate the upload that a draw would perform.
        assert!(mesh.buffers.take_dirty());
        assert!(!mesh.buffers.is_dirty());

        mesh.edit(
            vec![Vertex {
                position: [0.0; 3],
                uv: [0.0; 2],
            }],
            vec![],
        );
        assert!(mesh.buffers.is_dirty());
        assert_eq!(mesh.vertices.len(), 1);
    }
}
