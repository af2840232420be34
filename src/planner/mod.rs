//! Planner facades: orchestrate components A–I into a single
//! `plan()` entry point per variant ([`spec.md` §3]'s
//! `PlanningRequest`/`Result`, §4.I's articulated extension).

pub mod articulated;
pub mod rigid2d;
pub mod rigid3d;

pub use articulated::ArticulatedPlanner3D;
pub use rigid2d::Planner2D;
pub use rigid3d::Planner3D;

use crate::graph::Graph;

/// Build/search/total wall-clock split ([`spec.md` §6] "Planning
/// times").
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanningTime {
    pub build_s: f64,
    pub search_s: f64,
    pub total_s: f64,
}

/// One planner run's result ([`spec.md` §3]/[`spec.md` §6]): the
/// assembled graph, whether a path was found, the path as a vertex-id
/// sequence, its cost, and timing.
#[derive(Clone, Debug)]
pub struct PlanningResult {
    pub graph: Graph,
    pub solved: bool,
    pub path: Vec<u32>,
    pub cost: f64,
    pub time: PlanningTime,
}

impl PlanningResult {
    pub fn unsolved(graph: Graph, time: PlanningTime) -> Self {
        PlanningResult { graph, solved: false, path: Vec::new(), cost: f64::INFINITY, time }
    }

    /// The solved path's vertex coordinates, in path order.
    pub fn solved_path_coordinates(&self) -> Vec<Vec<f64>> {
        self.path.iter().map(|&v| self.graph.vertices[v as usize].clone()).collect()
    }
}

pub(crate) fn seeded_rng(seed: u64) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    rand::rngs::StdRng::from_seed(bytes)
}
