//! Per-layer Minkowski boundary construction ([`spec.md` §4.C]).
//!
//! Ordering is stable: arenas first in scene order, then obstacles in
//! scene order; per-body outputs within each follow tree order (base
//! then links), matching [`spec.md` §3]'s `Boundary` invariant.

use nalgebra::Matrix2xX;
use rayon::prelude::*;

use crate::body::{BodyTree2D, BodyTree3D};
use crate::geometry::{MeshMatrix, SuperEllipse, SuperQuadric};

#[derive(Clone, Debug, Default)]
pub struct Boundary2D {
    pub arena: Vec<Matrix2xX<f64>>,
    pub obstacle: Vec<Matrix2xX<f64>>,
}

pub fn boundary_gen_2d(robot: &BodyTree2D, arenas: &[SuperEllipse], obstacles: &[SuperEllipse]) -> Boundary2D {
    let arena: Vec<Matrix2xX<f64>> = arenas.par_iter().flat_map(|a| robot.mink_sum(a, -1)).collect();
    let obstacle: Vec<Matrix2xX<f64>> = obstacles.par_iter().flat_map(|o| robot.mink_sum(o, 1)).collect();
    Boundary2D { arena, obstacle }
}

#[derive(Clone, Debug, Default)]
pub struct Boundary3D {
    pub arena: Vec<MeshMatrix>,
    pub obstacle: Vec<MeshMatrix>,
}

pub fn boundary_gen_3d(robot: &BodyTree3D, arenas: &[SuperQuadric], obstacles: &[SuperQuadric]) -> Boundary3D {
    let arena: Vec<MeshMatrix> = arenas
        .par_iter()
        .flat_map(|a| robot.mink_sum(a, -1).into_iter().map(|pts| MeshMatrix::from_quadric_grid(pts, a.num)).collect::<Vec<_>>())
        .collect();
    let obstacle: Vec<MeshMatrix> = obstacles
        .par_iter()
        .flat_map(|o| robot.mink_sum(o, 1).into_iter().map(|pts| MeshMatrix::from_quadric_grid(pts, o.num)).collect::<Vec<_>>())
        .collect();
    Boundary3D { arena, obstacle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn ordering_is_arenas_then_obstacles_in_tree_order() {
        let base = SuperEllipse::new([1.0, 0.5], 1.0, Vector2::zeros(), 0.0, 16).unwrap();
        let mut tree = BodyTree2D::new(base);
        tree.add_link(SuperEllipse::new([0.2, 0.2], 1.0, Vector2::zeros(), 0.0, 16).unwrap(), nalgebra::Isometry2::identity());

        let arenas = vec![SuperEllipse::new([10.0, 10.0], 1.0, Vector2::zeros(), 0.0, 16).unwrap()];
        let obstacles = vec![
            SuperEllipse::new([1.0, 1.0], 1.0, Vector2::new(3.0, 0.0), 0.0, 16).unwrap(),
            SuperEllipse::new([1.0, 1.0], 1.0, Vector2::new(-3.0, 0.0), 0.0, 16).unwrap(),
        ];

        let bd = boundary_gen_2d(&tree, &arenas, &obstacles);
        assert_eq!(bd.arena.len(), 2); // 1 arena x (base + 1 link)
        assert_eq!(bd.obstacle.len(), 4); // 2 obstacles x (base + 1 link)
    }

    #[test]
    fn boundary_3d_yields_triangulated_meshes() {
        use crate::body::BodyTree3D;
        use nalgebra::{UnitQuaternion, Vector3};

        let base = SuperQuadric::new([1.0, 1.0, 1.0], [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 12).unwrap();
        let tree = BodyTree3D::new(base);
        let arenas = vec![SuperQuadric::new([10.0, 10.0, 10.0], [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 12).unwrap()];

        let bd = boundary_gen_3d(&tree, &arenas, &[]);
        assert_eq!(bd.arena.len(), 1);
        assert!(!bd.arena[0].faces.is_empty());
    }
}
