//! 3D rigid-body planner facade.

use nalgebra::{Quaternion, UnitQuaternion, Vector4};
use rand::Rng;
use std::f64::consts::PI;

use crate::body::BodyTree3D;
use crate::boundary::boundary_gen_3d;
use crate::bridge::connect_bridge_3d;
use crate::config::PlannerParameter;
use crate::error::Result;
use crate::geometry::quaternion::interpolate_quaternion;
use crate::geometry::SuperQuadric;
use crate::graph::layer::build_layer_graph_3d;
use crate::graph::search::{nearest_vertices, plan as search_plan, SearchOutcome};
use crate::graph::Graph;
use crate::instrumentation::Timer;
use crate::planner::{seeded_rng, PlanningResult, PlanningTime};
use crate::roadmap::RoadMap;
use crate::sweep::{compute_free_segment_3d, enhance_decomposition_3d};

pub struct Planner3D {
    pub robot: BodyTree3D,
    pub arenas: Vec<SuperQuadric>,
    pub obstacles: Vec<SuperQuadric>,
    pub params: PlannerParameter,
}

/// Uniform-random unit quaternion via Shoemake's algorithm.
fn random_unit_quaternion(rng: &mut rand::rngs::StdRng) -> UnitQuaternion<f64> {
    let u1: f64 = rng.gen_range(0.0, 1.0);
    let u2: f64 = rng.gen_range(0.0, 2.0 * PI);
    let u3: f64 = rng.gen_range(0.0, 2.0 * PI);
    let s1 = (1.0 - u1).sqrt();
    let s2 = u1.sqrt();
    let q = Quaternion::new(s2 * u3.cos(), s1 * u2.sin(), s1 * u2.cos(), s2 * u3.sin());
    UnitQuaternion::new_normalize(q)
}

impl Planner3D {
    pub fn new(robot: BodyTree3D, arenas: Vec<SuperQuadric>, obstacles: Vec<SuperQuadric>, params: PlannerParameter) -> Result<Self> {
        params.validate()?;
        Ok(Planner3D { robot, arenas, obstacles, params })
    }

    fn grids(&self) -> (Vec<f64>, Vec<f64>) {
        let (x_min, x_max) = (self.params.bound_limit[0], self.params.bound_limit[1]);
        let (y_min, y_max) = (self.params.bound_limit[2], self.params.bound_limit[3]);
        let tx = (0..self.params.num_line_x).map(|i| x_min + (x_max - x_min) * i as f64 / (self.params.num_line_x - 1) as f64).collect();
        let ty = (0..self.params.num_line_y).map(|i| y_min + (y_max - y_min) * i as f64 / (self.params.num_line_y - 1) as f64).collect();
        (tx, ty)
    }

    /// A preset quaternion list on the base shape (`quat_samples`)
    /// takes precedence (the CSV-driven preset-orientation path);
    /// otherwise slices are drawn uniformly at random via the
    /// injected seeded RNG (the `"0"` sentinel path).
    fn orientation_slices(&self) -> Vec<UnitQuaternion<f64>> {
        if let Some(samples) = &self.robot.base.quat_samples {
            return samples.clone();
        }
        if self.params.num_layer == 1 {
            return vec![UnitQuaternion::identity()];
        }
        let mut rng = seeded_rng(self.params.rng_seed);
        (0..self.params.num_layer).map(|_| random_unit_quaternion(&mut rng)).collect()
    }

    /// `start`/`goal` are `[x, y, z, q_w, q_i, q_j, q_k]`.
    pub fn plan(&self, start: [f64; 7], goal: [f64; 7]) -> PlanningResult {
        let start = query_vertex_coords(start);
        let goal = query_vertex_coords(goal);
        let build_timer = Timer::start();
        let quats = self.orientation_slices();
        let (tx, ty) = self.grids();

        let mut roadmap = RoadMap::new();
        let mut layers: Vec<(Vec<u32>, Graph)> = Vec::with_capacity(quats.len());

        for &quat in &quats {
            let bd = boundary_gen_3d(&self.robot, &self.arenas, &self.obstacles);
            let mut seg = compute_free_segment_3d(&tx, &ty, &bd.arena, &bd.obstacle);
            enhance_decomposition_3d(&mut seg);
            let orientation = quat_orientation_coords(quat);
            let layer_graph = build_layer_graph_3d(&seg, &orientation);
            log::debug!("layer at quat={:?} built with {} vertices", orientation, layer_graph.num_vertices());
            let map = roadmap.add_layer(&layer_graph);
            layers.push((map, layer_graph));
        }

        for i in 0..layers.len().saturating_sub(1) {
            let (map_a, graph_a) = &layers[i];
            let (map_b, graph_b) = &layers[i + 1];
            let edges = connect_bridge_3d(&self.robot, &self.arenas, &self.obstacles, graph_a, quats[i], graph_b, quats[i + 1], &self.params);
            roadmap.add_bridge_edges(map_a, map_b, &edges);
        }
        if layers.len() > 2 {
            let last = layers.len() - 1;
            let (map_last, graph_last) = &layers[last];
            let (map_first, graph_first) = &layers[0];
            let edges = connect_bridge_3d(&self.robot, &self.arenas, &self.obstacles, graph_last, quats[last], graph_first, quats[0], &self.params);
            roadmap.add_bridge_edges(map_last, map_first, &edges);
        }

        let build_s = build_timer.dur_s();
        let search_timer = Timer::start();
        let start_neighbors = nearest_vertices(&roadmap.graph, &start, self.params.num_search_neighbor, self.params.search_radius);
        let goal_neighbors = nearest_vertices(&roadmap.graph, &goal, self.params.num_search_neighbor, self.params.search_radius);
        let outcome = search_plan(&roadmap.graph, &start_neighbors, &goal_neighbors);
        let search_s = search_timer.dur_s();
        let time = PlanningTime { build_s, search_s, total_s: build_s + search_s };

        match outcome {
            SearchOutcome::Found { path, cost } => {
                log::info!("3D plan solved across {} layers, cost {:.3}", quats.len(), cost);
                PlanningResult { graph: roadmap.graph, solved: true, path, cost, time }
            }
            SearchOutcome::Exhausted => {
                log::warn!("3D plan exhausted search across {} layers", quats.len());
                PlanningResult::unsolved(roadmap.graph, time)
            }
        }
    }
}

fn quat_orientation_coords(q: UnitQuaternion<f64>) -> [f64; 4] {
    let c = q.into_inner().coords;
    [c[0], c[1], c[2], c[3]]
}

/// Reorders a `[x, y, z, q_w, q_i, q_j, q_k]` query point (scalar-first,
/// matching §3's convention) into the `[x, y, z, q_i, q_j, q_k, q_w]`
/// layout layer vertices are stored in (nalgebra's internal component
/// order, scalar last; see [`quat_orientation_coords`]), so Euclidean
/// distance in [`crate::graph::search::nearest_vertices`] compares like
/// components instead of `q_w` against `q_i`.
fn query_vertex_coords(v: [f64; 7]) -> [f64; 7] {
    [v[0], v[1], v[2], v[4], v[5], v[6], v[3]]
}

/// Linear-in-translation, slerp-in-orientation interpolation of a
/// solved path, `m` steps per edge.
pub fn interpolate_solution_path(result: &PlanningResult, m: usize) -> Vec<[f64; 7]> {
    if result.path.len() < 2 {
        return result
            .solved_path_coordinates()
            .iter()
            .map(|v| [v[0], v[1], v[2], v[3], v[4], v[5], v[6]])
            .collect();
    }
    let mut out = Vec::new();
    for w in result.path.windows(2) {
        let a = &result.graph.vertices[w[0] as usize];
        let b = &result.graph.vertices[w[1] as usize];
        let qa = UnitQuaternion::new_normalize(Quaternion::from_vector(Vector4::new(a[3], a[4], a[5], a[6])));
        let qb = UnitQuaternion::new_normalize(Quaternion::from_vector(Vector4::new(b[3], b[4], b[5], b[6])));
        let quats = interpolate_quaternion(qa, qb, m.max(2));
        for (i, &q) in quats.iter().enumerate() {
            let t = i as f64 / (m.max(2) - 1) as f64;
            let c = q.into_inner().coords;
            out.push([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t, c[3], c[0], c[1], c[2]]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn quadric(a0: f64, a1: f64, a2: f64, x: f64, y: f64, z: f64) -> SuperQuadric {
        SuperQuadric::new([a0, a1, a2], [1.0, 1.0], Vector3::new(x, y, z), UnitQuaternion::identity(), 10).unwrap()
    }

    #[test]
    fn open_arena_single_layer_solves() {
        let robot = BodyTree3D::new(quadric(0.3, 0.3, 0.3, 0.0, 0.0, 0.0));
        let params = PlannerParameter {
            num_layer: 1,
            num_line_x: 11,
            num_line_y: 11,
            bound_limit: vec![-10.0, 10.0, -10.0, 10.0, -10.0, 10.0],
            ..PlannerParameter::default()
        };
        let planner = Planner3D::new(robot, vec![quadric(10.0, 10.0, 10.0, 0.0, 0.0, 0.0)], vec![], params).unwrap();

        let result = planner.plan([-5.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [5.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert!(result.solved);
    }
}
