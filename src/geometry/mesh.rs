//! [`spec.md` §3]'s `MeshMatrix`: a vertex matrix plus a face-index
//! matrix, used only for 3D line–mesh intersection ([`spec.md` §4.A]).

use nalgebra::Matrix3xX;

#[derive(Clone, Debug)]
pub struct MeshMatrix {
    pub vertices: Matrix3xX<f64>,
    pub faces: Vec<[u32; 3]>,
}

impl MeshMatrix {
    /// Triangulate a `num x num` superquadric parameter grid (as
    /// produced by [`crate::geometry::SuperQuadric::surface_samples`]):
    /// each quad `(i,j)-(i,j+1)-(i+1,j+1)-(i+1,j)` becomes two
    /// triangles. Longitude wraps (`j` modulo `num`); latitude does not
    /// (open at the two poles, where the quad degenerates harmlessly
    /// into a sliver).
    pub fn from_quadric_grid(vertices: Matrix3xX<f64>, num: usize) -> MeshMatrix {
        let mut faces = Vec::with_capacity(2 * num * num);
        let idx = |i: usize, j: usize| (i * num + (j % num)) as u32;
        for i in 0..num.saturating_sub(1) {
            for j in 0..num {
                let a = idx(i, j);
                let b = idx(i, j + 1);
                let c = idx(i + 1, j + 1);
                let d = idx(i + 1, j);
                faces.push([a, b, c]);
                faces.push([a, c, d]);
            }
        }
        MeshMatrix { vertices, faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SuperQuadric;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn triangulation_covers_every_quad() {
        let q = SuperQuadric::new([1.0, 1.0, 1.0], [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 8).unwrap();
        let mesh = MeshMatrix::from_quadric_grid(q.surface_samples(), 8);
        assert_eq!(mesh.faces.len(), 2 * 7 * 8);
        for f in &mesh.faces {
            for &vi in f {
                assert!((vi as usize) < mesh.vertices.ncols());
            }
        }
    }
}
