//! World-axes reference object: three thin boxes along X, Y, Z with a
//! static shader.

use std::path::Path;

use crate::gpu::pipeline::MeshPipeline;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader::{self, ShaderError};
use crate::mesh::{Mesh, Triangle, Vertex};
use crate::renderer::Renderer;
use crate::scene::{Component, Object};

const AXES_SHADER_PATH: &str = "assets/shaders/axes.wgsl";

/// Half-length of each axis box.
const END: f32 = 10.0;
/// Half-thickness of each axis box.
const EPS: f32 = 0.01;

fn axes_mesh() -> (Vec<Vertex>, Vec<Triangle>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for axis in 0..3u32 {
        // Box corners; bit 2/1/0 of the vertex index encode the sign of
        // x/y/z.
        for i in [-1.0f32, 1.0] {
            for j in [-1.0f32, 1.0] {
                for k in [-1.0f32, 1.0] {
                    vertices.push(Vertex {
                        position: [
                            i * if axis == 0 { END } else { EPS },
                            j * if axis == 1 { END } else { EPS },
                            k * if axis == 2 { END } else { EPS },
                        ],
                        uv: [0.0, 0.0],
                    });
                }
            }
        }

        // From each of these four corners, the three single-bit flips
        // reach its neighbors; together the twelve triangles close the box.
        for base in [0b000u32, 0b011, 0b110, 0b101] {
            for j in 0..2u32 {
                for k in (j + 1)..3 {
                    indices.push(Triangle {
                        indices: [
                            base + axis * 8,
                            (base ^ (1 << j)) + axis * 8,
                            (base ^ (1 << k)) + axis * 8,
                        ],
                    });
                }
            }
        }
    }

    (vertices, indices)
}

/// Build the axes object: static mesh + renderer.
///
/// # Errors
///
/// Returns [`ShaderError`] if the axes shader fails to load or compile.
pub fn create_axes(gpu: &RenderContext) -> Result<Object, ShaderError> {
    let shader = shader::load(Path::new(AXES_SHADER_PATH))?;
    let pipeline = MeshPipeline::new(gpu, &shader, "Axes Pipeline");
    let (vertices, indices) = axes_mesh();

    let mut obj = Object::new();
    obj.add_component(Component::Renderer(Renderer::new(pipeline)));
    obj.add_component(Component::Mesh(Mesh::new(vertices, indices)));
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_boxes_of_twelve_triangles() {
        let (vertices, indices) = axes_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for triangle in &indices {
            for &idx in &triangle.indices {
                assert!((idx as usize) < vertices.len());
            }
        }
    }

    #[test]
    fn each_box_is_elongated_along_its_axis() {
        let (vertices, _) = axes_mesh();
        // First box spans END along x, EPS elsewhere.
        assert_eq!(vertices[0].position, [-END, -EPS, -EPS]);
        // Second box (vertices 8..16) spans END along y.
        assert_eq!(vertices[8].position, [-EPS, -END, -EPS]);
        // Third box spans END along z.
        assert_eq!(vertices[16].position, [-EPS, -EPS, -END]);
    }
}
