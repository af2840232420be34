//! End-to-end scenarios grounded on `spec.md` §8's scenario table:
//! open 2D arena, 2D arena with a circumvented obstacle, and a 3D
//! ellipsoidal body past an obstacle wall.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

use hrm_planner::body::{BodyTree2D, BodyTree3D};
use hrm_planner::geometry::{SuperEllipse, SuperQuadric};
use hrm_planner::{Planner2D, Planner3D, PlannerParameter};

fn ellipse(a0: f64, a1: f64, x: f64, y: f64) -> SuperEllipse {
    SuperEllipse::new([a0, a1], 1.0, Vector2::new(x, y), 0.0, 24).unwrap()
}

fn quadric(a0: f64, a1: f64, a2: f64, x: f64, y: f64, z: f64) -> SuperQuadric {
    SuperQuadric::new([a0, a1, a2], [1.0, 1.0], Vector3::new(x, y, z), UnitQuaternion::identity(), 12).unwrap()
}

/// Scenario 1: open 2D arena, straight-line start/goal, no obstacles.
#[test]
fn open_2d_arena_solves_with_near_diagonal_cost() {
    let robot = BodyTree2D::new(ellipse(1.0, 0.5, 0.0, 0.0));
    let arenas = vec![ellipse(10.0, 10.0, 0.0, 0.0)];
    let params = PlannerParameter { num_layer: 1, num_line_y: 20, bound_limit: vec![-10.0, 10.0, -10.0, 10.0], ..PlannerParameter::default() };
    let planner = Planner2D::new(robot, arenas, vec![], params).unwrap();

    let result = planner.plan([-5.0, -5.0, 0.0], [5.0, 5.0, 0.0]);
    assert!(result.solved);
    assert!(result.path.len() >= 2);
    assert!(result.cost.is_finite());
    assert!(result.cost <= 15.0, "cost {} should stay close to the diagonal distance", result.cost);
}

/// Scenario 2: same arena and body, an obstacle straddling the
/// straight-line path forces the solution to circumvent the origin.
#[test]
fn obstacle_on_the_direct_path_forces_a_detour() {
    let robot = BodyTree2D::new(ellipse(1.0, 0.5, 0.0, 0.0));
    let arenas = vec![ellipse(10.0, 10.0, 0.0, 0.0)];
    let obstacles = vec![ellipse(0.3, 0.3, 0.0, 0.0)];
    let params = PlannerParameter { num_layer: 1, num_line_y: 40, bound_limit: vec![-10.0, 10.0, -10.0, 10.0], ..PlannerParameter::default() };
    let planner = Planner2D::new(robot, arenas, obstacles, params).unwrap();

    let result = planner.plan([-5.0, 0.0, 0.0], [5.0, 0.0, 0.0]);
    assert!(result.solved);
    let coords = result.solved_path_coordinates();
    assert!(coords.iter().any(|v| v[1].abs() > 0.3), "solution should route around the obstacle rather than straight through it");
}

/// Scenario 3: 3D arena, one ellipsoidal body, an obstacle wall
/// between start and goal.
#[test]
fn ellipsoidal_body_solves_past_an_obstacle_wall() {
    let robot = BodyTree3D::new(quadric(1.0, 1.0, 2.0, 0.0, 0.0, 0.0));
    let arenas = vec![quadric(10.0, 10.0, 10.0, 0.0, 0.0, 0.0)];
    let obstacles = vec![quadric(0.5, 4.0, 4.0, 0.0, 0.0, 0.0)];
    let params = PlannerParameter {
        num_layer: 1,
        num_line_x: 16,
        num_line_y: 16,
        bound_limit: vec![-10.0, 10.0, -10.0, 10.0, -10.0, 10.0],
        ..PlannerParameter::default()
    };
    let planner = Planner3D::new(robot, arenas, obstacles, params).unwrap();

    let result = planner.plan([-5.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [5.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    assert!(result.solved);
}

/// `NUM_LAYER=1` boundary behaviour (`spec.md` §8): the multi-layer
/// bridge step is a no-op and the result is simply the single-slice
/// roadmap's own connectivity.
#[test]
fn single_layer_roadmap_has_no_bridge_edges_beyond_its_own_layer() {
    let robot = BodyTree2D::new(ellipse(0.3, 0.3, 0.0, 0.0));
    let arenas = vec![ellipse(10.0, 10.0, 0.0, 0.0)];
    let params = PlannerParameter { num_layer: 1, num_line_y: 15, bound_limit: vec![-10.0, 10.0, -10.0, 10.0], ..PlannerParameter::default() };
    let planner = Planner2D::new(robot, arenas, vec![], params).unwrap();

    let result = planner.plan([-5.0, -5.0, 0.0], [5.0, 5.0, 0.0]);
    assert!(result.solved);
    for v in &result.graph.vertices {
        assert!((v[2]).abs() < 1e-9, "the lone layer's orientation coordinate must be fixed at 0");
    }
}
