use serde::{Deserialize, Serialize};

use crate::mesh::{Triangle, Vertex};

/// Grid resolution and (u,v) domain for the surface tessellation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Cell count along u.
    pub res_x: u32,
    /// Cell count along v.
    pub res_y: u32,
    /// Domain lower bound along u.
    pub u_min: f32,
    /// Domain upper bound along u.
    pub u_max: f32,
    /// Domain lower bound along v.
    pub v_min: f32,
    /// Domain upper bound along v.
    pub v_max: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            res_x: 1000,
            res_y: 1000,
            u_min: -3.0,
            u_max: 3.0,
            v_min: -3.0,
            v_max: 3.0,
        }
    }
}

/// Tessellate the (u,v) domain into a regular grid.
///
/// An N×M grid yields (N+1)(M+1) vertices and 2·N·M triangles, each cell
/// split along one diagonal. Positions carry the parameter pair as
/// (u, -1, v); the equation mapping to world space happens in the vertex
/// shader, which is why equation edits recompile the shader while grid
/// edits re-run this function.
#[must_use]
pub fn tessellate(grid: &GridParams) -> (Vec<Vertex>, Vec<Triangle>) {
    let verts_x = grid.res_x + 1;
    let verts_y = grid.res_y + 1;
    let width = grid.u_max - grid.u_min;
    let height = grid.v_max - grid.v_min;

    let mut vertices =
        vec![
            Vertex {
                position: [0.0; 3],
                uv: [0.0; 2]
            };
            (verts_x * verts_y) as usize
        ];
    for i in 0..verts_x {
        for j in 0..verts_y {
            let fract_u = i as f32 / verts_x as f32;
            let fract_v = j as f32 / verts_y as f32;
            vertices[(i * verts_y + j) as usize] = Vertex {
                position: [
                    grid.u_min + fract_u * width,
                    -1.0,
                    grid.v_min + fract_v * height,
                ],
                uv: [fract_u, fract_v],
            };
        }
    }

    let mut indices =
        Vec::with_capacity((grid.res_x * grid.res_y * 2) as usize);
    for i in 0..grid.res_x {
        for j in 0..grid.res_y {
            let corner = i * verts_y + j;
            indices.push(Triangle {
                indices: [corner, corner + verts_y, corner + 1],
            });
            indices.push(Triangle {
                indices: [corner + verts_y + 1, corner + verts_y, corner + 1],
            });
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(res_x: u32, res_y: u32) -> GridParams {
        GridParams {
            res_x,
            res_y,
            ..GridParams::default()
        }
    }

    #[test]
    fn counts_match_resolution() {
        for (rx, ry) in [(1, 1), (2, 2), (3, 7), (16, 9)] {
            let (vertices, indices) = tessellate(&grid(rx, ry));
            assert_eq!(vertices.len() as u32, (rx + 1) * (ry + 1));
            assert_eq!(indices.len() as u32, 2 * rx * ry);
        }
    }

    #[test]
    fn all_indices_are_in_bounds() {
        let (vertices, indices) = tessellate(&grid(2, 2));
        assert_eq!(vertices.len(), 9);
        assert_eq!(indices.len(), 8);
        for triangle in &indices {
            for &idx in &triangle.indices {
                assert!((idx as usize) < vertices.len());
            }
        }
    }

    #[test]
    fn default_resolution_counts() {
        let (vertices, indices) = tessellate(&GridParams::default());
        assert_eq!(vertices.len(), 1_002_001);
        assert_eq!(indices.len(), 2_000_000);
    }

    #[test]
    fn regeneration_is_bit_identical() {
        let params = grid(13, 5);
        let (va, ia) = tessellate(&params);
        let (vb, ib) = tessellate(&params);
        assert_eq!(va, vb);
        assert_eq!(ia, ib);
    }

    #[test]
    fn domain_is_inset_from_the_upper_bounds() {
        // The last row/column divides by the vertex count, so it lands one
        // cell-fraction short of u_max/v_max.
        let params = grid(4, 4);
        let (vertices, _) = tessellate(&params);
        let last = vertices.last().unwrap();
        assert!(last.position[0] < params.u_max);
        assert!(last.position[2] < params.v_max);
        assert_eq!(vertices[0].position[0], params.u_min);
    }

    #[test]
    fn zero_resolution_yields_no_triangles() {
        let (vertices, indices) = tessellate(&grid(0, 0));
        assert_eq!(vertices.len(), 1);
        assert!(indices.is_empty());
    }
}
