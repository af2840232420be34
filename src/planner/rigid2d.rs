//! 2D rigid-body planner facade.

use rand::Rng;
use std::f64::consts::PI;

use crate::body::BodyTree2D;
use crate::boundary::boundary_gen_2d;
use crate::bridge::connect_bridge_2d;
use crate::config::PlannerParameter;
use crate::error::Result;
use crate::geometry::quaternion::interpolate_angle;
use crate::geometry::SuperEllipse;
use crate::graph::layer::build_layer_graph_2d;
use crate::graph::search::{nearest_vertices, plan as search_plan, SearchOutcome};
use crate::graph::Graph;
use crate::instrumentation::Timer;
use crate::planner::{seeded_rng, PlanningResult, PlanningTime};
use crate::roadmap::RoadMap;
use crate::sweep::{compute_free_segment_2d, enhance_decomposition};

pub struct Planner2D {
    pub robot: BodyTree2D,
    pub arenas: Vec<SuperEllipse>,
    pub obstacles: Vec<SuperEllipse>,
    pub params: PlannerParameter,
}

impl Planner2D {
    pub fn new(robot: BodyTree2D, arenas: Vec<SuperEllipse>, obstacles: Vec<SuperEllipse>, params: PlannerParameter) -> Result<Self> {
        params.validate()?;
        Ok(Planner2D { robot, arenas, obstacles, params })
    }

    fn y_grid(&self) -> Vec<f64> {
        let (y_min, y_max) = (self.params.bound_limit[2], self.params.bound_limit[3]);
        (0..self.params.num_line_y).map(|i| y_min + (y_max - y_min) * i as f64 / (self.params.num_line_y - 1) as f64).collect()
    }

    /// Orientation sampled uniformly on `(-pi, pi]` via the injected
    /// seeded RNG; a single layer is fixed at `theta = 0`.
    fn orientation_slices(&self) -> Vec<f64> {
        if self.params.num_layer == 1 {
            return vec![0.0];
        }
        let mut rng = seeded_rng(self.params.rng_seed);
        (0..self.params.num_layer).map(|_| rng.gen_range(-PI, PI)).collect()
    }

    /// Build the roadmap (layers + bridges, including the wraparound
    /// bridge from the last orientation slice back to the first) and
    /// solve a `(start, goal)` query, each `[x, y, theta]`.
    pub fn plan(&self, start: [f64; 3], goal: [f64; 3]) -> PlanningResult {
        let build_timer = Timer::start();
        let thetas = self.orientation_slices();
        let ty = self.y_grid();

        let mut roadmap = RoadMap::new();
        let mut layers: Vec<(Vec<u32>, Graph)> = Vec::with_capacity(thetas.len());

        for &theta in &thetas {
            let bd = boundary_gen_2d(&self.robot, &self.arenas, &self.obstacles);
            let mut seg = compute_free_segment_2d(&ty, &bd.arena, &bd.obstacle);
            enhance_decomposition(&mut seg);
            let layer_graph = build_layer_graph_2d(&seg, &[theta]);
            log::debug!("layer at theta={:.3} built with {} vertices", theta, layer_graph.num_vertices());
            let map = roadmap.add_layer(&layer_graph);
            layers.push((map, layer_graph));
        }

        for i in 0..layers.len().saturating_sub(1) {
            let (map_a, graph_a) = &layers[i];
            let (map_b, graph_b) = &layers[i + 1];
            let edges = connect_bridge_2d(&self.robot, &self.arenas, &self.obstacles, graph_a, thetas[i], graph_b, thetas[i + 1], &self.params);
            roadmap.add_bridge_edges(map_a, map_b, &edges);
        }
        if layers.len() > 2 {
            let last = layers.len() - 1;
            let (map_last, graph_last) = &layers[last];
            let (map_first, graph_first) = &layers[0];
            let edges = connect_bridge_2d(&self.robot, &self.arenas, &self.obstacles, graph_last, thetas[last], graph_first, thetas[0], &self.params);
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
                log::info!("2D plan solved across {} layers, cost {:.3}", thetas.len(), cost);
                PlanningResult { graph: roadmap.graph, solved: true, path, cost, time }
            }
            SearchOutcome::Exhausted => {
                log::warn!("2D plan exhausted search across {} layers", thetas.len());
                PlanningResult::unsolved(roadmap.graph, time)
            }
        }
    }
}

/// Linear-in-translation, shortest-arc-in-angle interpolation of a
/// solved path, `m` steps per edge ([`spec.md` §6] "interpolated
/// path").
pub fn interpolate_solution_path(result: &PlanningResult, m: usize) -> Vec<[f64; 3]> {
    if result.path.len() < 2 {
        return result.solved_path_coordinates().iter().map(|v| [v[0], v[1], v[2]]).collect();
    }
    let mut out = Vec::new();
    for w in result.path.windows(2) {
        let a = &result.graph.vertices[w[0] as usize];
        let b = &result.graph.vertices[w[1] as usize];
        let angles = interpolate_angle(a[2], b[2], m.max(2));
        for (i, &theta) in angles.iter().enumerate() {
            let t = i as f64 / (m.max(2) - 1) as f64;
            out.push([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, theta]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn ellipse(a0: f64, a1: f64, x: f64, y: f64) -> SuperEllipse {
        SuperEllipse::new([a0, a1], 1.0, Vector2::new(x, y), 0.0, 16).unwrap()
    }

    #[test]
    fn open_arena_single_layer_solves_with_a_straight_path() {
        let robot = BodyTree2D::new(ellipse(0.3, 0.3, 0.0, 0.0));
        let params = PlannerParameter { num_layer: 1, num_line_y: 21, bound_limit: vec![-10.0, 10.0, -10.0, 10.0], ..PlannerParameter::default() };
        let planner = Planner2D::new(robot, vec![ellipse(10.0, 10.0, 0.0, 0.0)], vec![], params).unwrap();

        let result = planner.plan([-5.0, -5.0, 0.0], [5.0, 5.0, 0.0]);
        assert!(result.solved);
        assert!(result.path.len() >= 2);
    }

    #[test]
    fn disconnected_query_is_reported_unsolved() {
        let robot = BodyTree2D::new(ellipse(0.3, 0.3, 0.0, 0.0));
        let params = PlannerParameter { num_layer: 1, num_line_y: 9, bound_limit: vec![-10.0, 10.0, -10.0, 10.0], search_radius: 1e-3, ..PlannerParameter::default() };
        let planner = Planner2D::new(robot, vec![ellipse(10.0, 10.0, 0.0, 0.0)], vec![], params).unwrap();

        let result = planner.plan([-5.0, -5.0, 0.0], [50.0, 50.0, 0.0]);
        assert!(!result.solved);
        assert_eq!(result.cost, f64::INFINITY);
    }
}
