//! External scene/kinematics/artefact interfaces ([`spec.md` §6]):
//! named trait contracts only. CSV/URDF loading, scene description
//! parsing and artefact export are out of scope for this crate (see
//! `spec.md`'s Non-goals); a caller implements these against its own
//! scene format and wires the results into the planner facades in
//! [`crate::planner`].

use nalgebra::{Isometry2, Isometry3, Vector2, Vector3};

use crate::error::PlannerError;
use crate::geometry::{SuperEllipse, SuperQuadric};

/// A single arena/obstacle shape, dimension-erased so one scene can
/// describe either a 2D or a 3D problem.
#[derive(Clone, Debug)]
pub enum SceneShape {
    Ellipse(SuperEllipse),
    Quadric(SuperQuadric),
}

/// A robot's base shape plus ordered link shapes with their relative
/// transforms, dimension-erased like [`SceneShape`].
#[derive(Clone, Debug)]
pub enum RobotSpec {
    Planar { base: SuperEllipse, links: Vec<(SuperEllipse, Isometry2<f64>)> },
    Spatial { base: SuperQuadric, links: Vec<(SuperQuadric, Isometry3<f64>)> },
}

/// Supplies arenas, obstacles and a robot description. Implemented by a
/// CSV/URDF loader outside this crate; the planner facades only ever
/// consume the shapes/bodies such a loader would produce, never a
/// `SceneSource` directly.
pub trait SceneSource {
    fn arenas(&self) -> &[SceneShape];
    fn obstacles(&self) -> &[SceneShape];
    fn robot(&self) -> &RobotSpec;
}

/// One revolute joint's axis and origin in a URDF-like kinematic chain,
/// used by the articulated extension's forward kinematics
/// ([`crate::planner::articulated`]).
#[derive(Clone, Debug)]
pub struct JointDescription {
    pub axis: Vector3<f64>,
    pub origin: Isometry3<f64>,
    pub limit: Option<(f64, f64)>,
}

/// An ordered joint list for an articulated robot. Implemented by an
/// external URDF loader; this crate only consumes the resulting
/// [`crate::planner::articulated::Joint`] list.
pub trait KinematicsSource {
    fn joints(&self) -> &[JointDescription];
}

/// A sink for named tables of rows the planner never writes itself
/// (solution paths, per-layer vertex counts, timings). A harness wires
/// a CSV-writing implementation if it wants these artefacts persisted;
/// the planner core performs no file I/O.
pub trait ArtefactSink {
    fn write_table(&mut self, name: &str, rows: &[Vec<f64>]) -> Result<(), PlannerError>;
}

/// Row-major points, used by a few scene shapes in their raw form.
#[derive(Clone, Debug, Default)]
pub struct PointCloud2D(pub Vec<Vector2<f64>>);

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::UnitQuaternion;

    struct Recorder(Vec<(String, usize)>);

    impl ArtefactSink for Recorder {
        fn write_table(&mut self, name: &str, rows: &[Vec<f64>]) -> Result<(), PlannerError> {
            self.0.push((name.to_string(), rows.len()));
            Ok(())
        }
    }

    #[test]
    fn artefact_sink_is_object_safe_and_callable() {
        let mut rec = Recorder(Vec::new());
        rec.write_table("path", &[vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        assert_eq!(rec.0, vec![("path".to_string(), 2)]);
    }

    #[test]
    fn scene_shape_variants_construct() {
        let _ = SceneShape::Quadric(
            SuperQuadric::new([1.0, 1.0, 1.0], [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 8).unwrap(),
        );
    }
}
