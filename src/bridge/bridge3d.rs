use nalgebra::{Isometry3, Quaternion, UnitQuaternion, Vector3, Vector4};

use crate::body::BodyTree3D;
use crate::boundary::boundary_gen_3d;
use crate::config::PlannerParameter;
use crate::geometry::ellipsoid_fit::tfe_3d;
use crate::geometry::mesh::MeshMatrix;
use crate::geometry::quaternion::interpolate_quaternion;
use crate::geometry::SuperQuadric;
use crate::graph::Graph;
use crate::sweep::{compute_free_segment_3d, enhance_decomposition_3d, FreeSegment3D};

/// One TFE per body (base, then links), each link's orientation being
/// its relative rotation composed with the slice orientation.
pub fn tfe_list_3d(robot: &BodyTree3D, quat_a: UnitQuaternion<f64>, quat_b: UnitQuaternion<f64>, n_step: usize, num: usize) -> Vec<SuperQuadric> {
    let mut out = Vec::with_capacity(1 + robot.links.len());
    out.push(tfe_3d(robot.base.semi_axes, quat_a, quat_b, n_step, num));
    for (link, rel) in robot.links.iter().zip(robot.rel_transforms.iter()) {
        out.push(tfe_3d(link.semi_axes, quat_a * rel.rotation, quat_b * rel.rotation, n_step, num));
    }
    out
}

fn vertex_quat(v: &[f64]) -> UnitQuaternion<f64> {
    let q = Quaternion::from_vector(Vector4::new(v[3], v[4], v[5], v[6]));
    UnitQuaternion::new_normalize(q)
}

fn quat_coords(q: UnitQuaternion<f64>) -> [f64; 4] {
    let c = q.into_inner().coords;
    [c[0], c[1], c[2], c[3]]
}

fn middle_layer_segment(
    robot: &BodyTree3D,
    arenas: &[SuperQuadric],
    obstacles: &[SuperQuadric],
    quat_a: UnitQuaternion<f64>,
    quat_b: UnitQuaternion<f64>,
    params: &PlannerParameter,
) -> FreeSegment3D {
    let tfes = tfe_list_3d(robot, quat_a, quat_b, params.num_point, 12);
    let mut mid_tree = BodyTree3D::new(tfes[0].clone());
    for t in tfes.iter().skip(1) {
        mid_tree.add_link(t.clone(), Isometry3::identity());
    }
    let mid_boundary = boundary_gen_3d(&mid_tree, arenas, obstacles);

    let (x_min, x_max, y_min, y_max) = (params.bound_limit[0], params.bound_limit[1], params.bound_limit[2], params.bound_limit[3]);
    let tx: Vec<f64> = (0..params.num_line_x).map(|i| x_min + (x_max - x_min) * i as f64 / (params.num_line_x - 1) as f64).collect();
    let ty: Vec<f64> = (0..params.num_line_y).map(|i| y_min + (y_max - y_min) * i as f64 / (params.num_line_y - 1) as f64).collect();

    let arena_meshes: &[MeshMatrix] = &mid_boundary.arena;
    let obstacle_meshes: &[MeshMatrix] = &mid_boundary.obstacle;
    let mut seg = compute_free_segment_3d(&tx, &ty, arena_meshes, obstacle_meshes);
    enhance_decomposition_3d(&mut seg);
    seg
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

fn transition_is_free(robot: &BodyTree3D, mid_seg: &FreeSegment3D, pa: Vector3<f64>, qa: UnitQuaternion<f64>, pb: Vector3<f64>, qb: UnitQuaternion<f64>, n_point: usize) -> bool {
    let quats = interpolate_quaternion(qa, qb, n_point);
    for (i, &quat) in quats.iter().enumerate() {
        let t = i as f64 / (n_point - 1) as f64;
        let pos = pa + (pb - pa) * t;
        if !mid_seg.contains(pos.x, pos.y, pos.z) {
            return false;
        }
        let base_pose = Isometry3::from_parts(pos.into(), quat);
        for rel in &robot.rel_transforms {
            let c = (base_pose * rel).translation.vector;
            if !mid_seg.contains(c.x, c.y, c.z) {
                return false;
            }
        }
    }
    true
}

/// 3D analogue of [`crate::bridge::bridge2d::connect_bridge_2d`].
/// Vertex layout is `[x, y, z, qi, qj, qk, qw]` (the quaternion stored
/// in `UnitQuaternion`'s own internal component order, round-tripped
/// through [`vertex_quat`]/[`quat_coords`] rather than assumed).
pub fn connect_bridge_3d(
    robot: &BodyTree3D,
    arenas: &[SuperQuadric],
    obstacles: &[SuperQuadric],
    layer_a: &Graph,
    quat_a: UnitQuaternion<f64>,
    layer_b: &Graph,
    quat_b: UnitQuaternion<f64>,
    params: &PlannerParameter,
) -> Vec<(u32, u32, f64)> {
    let mid_seg = middle_layer_segment(robot, arenas, obstacles, quat_a, quat_b, params);
    let (y_min, y_max) = (params.bound_limit[2], params.bound_limit[3]);
    let threshold = (y_max - y_min) / params.num_line_y as f64;

    let mut edges = Vec::new();
    let mut resume_from = 0usize;
    for (ia, va) in layer_a.vertices.iter().enumerate() {
        let pa = Vector3::new(va[0], va[1], va[2]);
        let qa = vertex_quat(va);
        for ib in resume_from..layer_b.vertices.len() {
            let vb = &layer_b.vertices[ib];
            let pb = Vector3::new(vb[0], vb[1], vb[2]);
            let qb = vertex_quat(vb);
            if (pa - pb).norm() > threshold {
                continue;
            }
            if transition_is_free(robot, &mid_seg, pa, qa, pb, qb, params.num_point) {
                edges.push((ia as u32, ib as u32, euclidean(va, vb)));
                resume_from = ib;
                break;
            }
        }
    }
    edges
}

/// Append a vertex's translation plus its orientation's raw component
/// order, the layout [`connect_bridge_3d`] expects.
pub fn vertex_coords_3d(pos: Vector3<f64>, quat: UnitQuaternion<f64>) -> Vec<f64> {
    let q = quat_coords(quat);
    vec![pos.x, pos.y, pos.z, q[0], q[1], q[2], q[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quat_round_trips_through_vertex_coords() {
        let q = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        let coords = vertex_coords_3d(Vector3::new(1.0, 2.0, 3.0), q);
        let back = vertex_quat(&coords);
        assert!(q.angle_to(&back) < 1e-9);
    }
}
