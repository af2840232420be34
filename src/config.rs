//! Planner configuration parameters ([`spec.md` §6]).
//!
//! Mirrors the teacher's `Param`/`ParamTree` split: a plain, serde-able
//! struct of tunables with no behaviour of its own.

use serde::{Deserialize, Serialize};

/// Axis-aligned world bounds for sweep extent: `[x_min, x_max, y_min,
/// y_max]` (2D) or `[x_min, x_max, y_min, y_max, z_min, z_max]` (3D).
pub type BoundLimit = Vec<f64>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerParameter {
    /// Number of orientation slices (C-layers).
    pub num_layer: usize,
    /// Sweep-line raster density along x (3D outer sweep only).
    pub num_line_x: usize,
    /// Sweep-line raster density along y (2D) / y-z plane (3D).
    pub num_line_y: usize,
    /// World bounds the sweep lines are rasterised over.
    pub bound_limit: BoundLimit,
    /// Interpolation steps used to validate a bridge-layer transition.
    pub num_point: usize,
    /// `k` nearest neighbours considered when attaching start/goal.
    pub num_search_neighbor: usize,
    /// Radius used when attaching start/goal to the roadmap.
    pub search_radius: f64,
    /// Seed for the injected RNG (orientation sampling, articulated
    /// joint sampling). Never sourced from process-global randomness.
    pub rng_seed: u64,
    /// Wall-clock budget for the articulated (incremental) variant.
    /// `None` means "run to completion", matching the rigid variant.
    pub time_limit_s: Option<f64>,
}

impl Default for PlannerParameter {
    fn default() -> Self {
        PlannerParameter {
            num_layer: 10,
            num_line_x: 20,
            num_line_y: 20,
            bound_limit: vec![-10.0, 10.0, -10.0, 10.0],
            num_point: 5,
            num_search_neighbor: 10,
            search_radius: 1e3,
            rng_seed: 0,
            time_limit_s: None,
        }
    }
}

impl PlannerParameter {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.num_layer == 0 {
            return Err(crate::error::PlannerError::InvalidInput(
                "num_layer must be >= 1".into(),
            ));
        }
        if self.num_line_y < 2 {
            return Err(crate::error::PlannerError::InvalidInput(
                "num_line_y must be >= 2".into(),
            ));
        }
        if self.bound_limit.iter().any(|v| !v.is_finite()) {
            return Err(crate::error::PlannerError::InvalidInput(
                "bound_limit must be finite".into(),
            ));
        }
        if self.num_point < 2 {
            return Err(crate::error::PlannerError::InvalidInput(
                "num_point must be >= 2".into(),
            ));
        }
        Ok(())
    }
}
