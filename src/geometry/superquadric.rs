//! 3D superquadric: bi-parameter (`eps1`, `eps2`) generalisation of the
//! superellipse.

use nalgebra::{Matrix3xX, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::error::{PlannerError, Result};
use crate::geometry::signed_pow;

#[derive(Clone, Debug)]
pub struct SuperQuadric {
    pub semi_axes: [f64; 3],
    pub eps: [f64; 2],
    pub pos: Vector3<f64>,
    pub quat: UnitQuaternion<f64>,
    pub num: usize,
    /// Optional preset orientation slices (one quaternion per layer);
    /// `None` means the planner should generate them (uniform or
    /// seeded-random, per [`spec.md` §6]).
    pub quat_samples: Option<Vec<UnitQuaternion<f64>>>,
}

impl SuperQuadric {
    pub fn new(
        semi_axes: [f64; 3],
        eps: [f64; 2],
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
        num: usize,
    ) -> Result<Self> {
        if semi_axes.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            return Err(PlannerError::InvalidInput(format!(
                "superquadric semi-axes must be finite and positive, got {:?}",
                semi_axes
            )));
        }
        if eps.iter().any(|e| !e.is_finite() || *e <= 0.0 || *e >= 2.0) {
            return Err(PlannerError::InvalidInput(format!(
                "superquadric exponents must be in (0,2), got {:?}",
                eps
            )));
        }
        if num < 3 {
            return Err(PlannerError::InvalidInput(
                "superquadric sample count must be >= 3".into(),
            ));
        }
        Ok(SuperQuadric { semi_axes, eps, pos, quat, num, quat_samples: None })
    }

    pub fn set_pose(&mut self, pos: Vector3<f64>, quat: UnitQuaternion<f64>) {
        self.pos = pos;
        self.quat = quat;
    }

    /// `num x num` parameter grid sampled in the local frame. `eta` spans
    /// latitude `[-pi/2, pi/2]`, `omega` spans longitude `[-pi, pi]`.
    pub fn origin_shape(&self) -> Matrix3xX<f64> {
        let n = self.num;
        let mut out = Matrix3xX::zeros(n * n);
        let (e1, e2) = (self.eps[0], self.eps[1]);
        for i in 0..n {
            let eta = -PI / 2.0 + PI * (i as f64) / ((n - 1).max(1) as f64);
            for j in 0..n {
                let omega = -PI + 2.0 * PI * (j as f64) / (n as f64);
                let x = self.semi_axes[0] * signed_pow(eta.cos(), e1) * signed_pow(omega.cos(), e2);
                let y = self.semi_axes[1] * signed_pow(eta.cos(), e1) * signed_pow(omega.sin(), e2);
                let z = self.semi_axes[2] * signed_pow(eta.sin(), e1);
                out.set_column(i * n + j, &Vector3::new(x, y, z));
            }
        }
        out
    }

    pub fn surface_samples(&self) -> Matrix3xX<f64> {
        let local = self.origin_shape();
        let mut out = Matrix3xX::zeros(local.ncols());
        for i in 0..local.ncols() {
            let p = self.quat * local.column(i).into_owned() + self.pos;
            out.set_column(i, &p);
        }
        out
    }

    /// See [`crate::geometry::SuperEllipse::mink_sum_axes`]: closed-form
    /// axis-adjustment Minkowski sum/difference for ellipsoidal bodies.
    pub fn mink_sum_axes(&self, other_semi_axes: [f64; 3], k: i32) -> [f64; 3] {
        let sign = k as f64;
        [
            (self.semi_axes[0] + sign * other_semi_axes[0]).max(1e-9),
            (self.semi_axes[1] + sign * other_semi_axes[1]).max(1e-9),
            (self.semi_axes[2] + sign * other_semi_axes[2]).max(1e-9),
        ]
    }
}
