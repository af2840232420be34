use nalgebra::{Isometry2, Vector2};

use crate::body::BodyTree2D;
use crate::boundary::boundary_gen_2d;
use crate::config::PlannerParameter;
use crate::geometry::ellipsoid_fit::tfe_2d;
use crate::geometry::quaternion::interpolate_angle;
use crate::geometry::SuperEllipse;
use crate::graph::Graph;
use crate::sweep::{compute_free_segment_2d, enhance_decomposition, FreeSegment2D};

/// One TFE per body (base, then links in tree order): each link's
/// orientation is its relative rotation composed with the slice
/// orientation, so a link offset from the base still sweeps correctly.
pub fn tfe_list_2d(robot: &BodyTree2D, theta_a: f64, theta_b: f64, n_step: usize, num: usize) -> Vec<SuperEllipse> {
    let mut out = Vec::with_capacity(1 + robot.links.len());
    out.push(tfe_2d(robot.base.semi_axes, theta_a, theta_b, n_step, num));
    for (link, rel) in robot.links.iter().zip(robot.rel_transforms.iter()) {
        let rel_angle = rel.rotation.angle();
        out.push(tfe_2d(link.semi_axes, theta_a + rel_angle, theta_b + rel_angle, n_step, num));
    }
    out
}

fn middle_layer_segment(
    robot: &BodyTree2D,
    arenas: &[SuperEllipse],
    obstacles: &[SuperEllipse],
    theta_a: f64,
    theta_b: f64,
    params: &PlannerParameter,
) -> FreeSegment2D {
    let tfes = tfe_list_2d(robot, theta_a, theta_b, params.num_point, 16);
    let mut mid_tree = BodyTree2D::new(tfes[0].clone());
    for t in tfes.iter().skip(1) {
        mid_tree.add_link(t.clone(), Isometry2::identity());
    }
    let mid_boundary = boundary_gen_2d(&mid_tree, arenas, obstacles);

    let (y_min, y_max) = (params.bound_limit[2], params.bound_limit[3]);
    let ty: Vec<f64> = (0..params.num_line_y)
        .map(|i| y_min + (y_max - y_min) * i as f64 / (params.num_line_y - 1) as f64)
        .collect();
    let mut seg = compute_free_segment_2d(&ty, &mid_boundary.arena, &mid_boundary.obstacle);
    enhance_decomposition(&mut seg);
    seg
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

fn transition_is_free(robot: &BodyTree2D, mid_seg: &FreeSegment2D, pa: Vector2<f64>, ta: f64, pb: Vector2<f64>, tb: f64, n_point: usize) -> bool {
    let angles = interpolate_angle(ta, tb, n_point);
    for (i, &theta) in angles.iter().enumerate() {
        let t = i as f64 / (n_point - 1) as f64;
        let pos = pa + (pb - pa) * t;
        if !mid_seg.contains(pos.y, pos.x) {
            return false;
        }
        let base_pose = Isometry2::new(pos, theta);
        for rel in &robot.rel_transforms {
            let c = (base_pose * rel).translation.vector;
            if !mid_seg.contains(c.y, c.x) {
                return false;
            }
        }
    }
    true
}

/// Candidate edges between slice `layer_a` (orientation `theta_a`) and
/// slice `layer_b` (orientation `theta_b`), as `(index_in_a,
/// index_in_b, weight)` triples local to each layer's own vertex
/// numbering; the caller remaps these after merging both layers into
/// the shared roadmap graph.
pub fn connect_bridge_2d(
    robot: &BodyTree2D,
    arenas: &[SuperEllipse],
    obstacles: &[SuperEllipse],
    layer_a: &Graph,
    theta_a: f64,
    layer_b: &Graph,
    theta_b: f64,
    params: &PlannerParameter,
) -> Vec<(u32, u32, f64)> {
    let mid_seg = middle_layer_segment(robot, arenas, obstacles, theta_a, theta_b, params);
    let (y_min, y_max) = (params.bound_limit[2], params.bound_limit[3]);
    let threshold = (y_max - y_min) / params.num_line_y as f64;

    let mut edges = Vec::new();
    let mut resume_from = 0usize;
    for (ia, va) in layer_a.vertices.iter().enumerate() {
        let pa = Vector2::new(va[0], va[1]);
        let ta = va[2];
        for ib in resume_from..layer_b.vertices.len() {
            let vb = &layer_b.vertices[ib];
            let pb = Vector2::new(vb[0], vb[1]);
            let tb = vb[2];
            if (pa - pb).norm() > threshold {
                continue;
            }
            if transition_is_free(robot, &mid_seg, pa, ta, pb, tb, params.num_point) {
                edges.push((ia as u32, ib as u32, euclidean(va, vb)));
                resume_from = ib;
                break;
            }
        }
    }
    edges
}
