//! 2D superellipse: `(|x/a0|)^(2/eps) + (|x/a1|)^(2/eps) <= 1`.

use nalgebra::{Matrix2, Matrix2xX, Rotation2, Vector2};
use std::f64::consts::PI;

use crate::error::{PlannerError, Result};
use crate::geometry::signed_pow;

/// Immutable-after-construction except for pose (`theta`, `pos`), which a
/// rigid body updates when it is re-posed ([`spec.md` §3]).
#[derive(Clone, Debug)]
pub struct SuperEllipse {
    pub semi_axes: [f64; 2],
    pub eps: f64,
    pub pos: Vector2<f64>,
    pub theta: f64,
    pub num: usize,
}

impl SuperEllipse {
    pub fn new(semi_axes: [f64; 2], eps: f64, pos: Vector2<f64>, theta: f64, num: usize) -> Result<Self> {
        if semi_axes.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            return Err(PlannerError::InvalidInput(format!(
                "superellipse semi-axes must be finite and positive, got {:?}",
                semi_axes
            )));
        }
        if !eps.is_finite() || eps <= 0.0 || eps >= 2.0 {
            return Err(PlannerError::InvalidInput(format!(
                "superellipse eps must be in (0,2), got {}",
                eps
            )));
        }
        if num < 3 {
            return Err(PlannerError::InvalidInput(
                "superellipse sample count must be >= 3".into(),
            ));
        }
        Ok(SuperEllipse { semi_axes, eps, pos, theta, num })
    }

    pub fn set_pose(&mut self, pos: Vector2<f64>, theta: f64) {
        self.pos = pos;
        self.theta = theta;
    }

    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.theta)
    }

    /// Superellipse sampled at `self.num` points in the local (unrotated,
    /// untranslated) frame, parameter `t` ranging over `[-pi, pi]`.
    pub fn origin_shape(&self) -> Matrix2xX<f64> {
        let n = self.num;
        let mut out = Matrix2xX::zeros(n);
        for i in 0..n {
            let t = -PI + 2.0 * PI * (i as f64) / (n as f64);
            let x = self.semi_axes[0] * signed_pow(t.cos(), self.eps);
            let y = self.semi_axes[1] * signed_pow(t.sin(), self.eps);
            out.set_column(i, &Vector2::new(x, y));
        }
        out
    }

    /// World-space boundary samples: rotate then translate.
    pub fn surface_samples(&self) -> Matrix2xX<f64> {
        let r = self.rotation().into_inner();
        let local = self.origin_shape();
        let mut out = Matrix2xX::zeros(self.num);
        for i in 0..self.num {
            let p = r * local.column(i) + self.pos;
            out.set_column(i, &p);
        }
        out
    }

    /// Closed-form Minkowski sum/difference against another superellipse
    /// body at the same orientation convention used by
    /// [`crate::body::BodyTree2D::mink_sum`]: `k=+1` inflates (sum),
    /// `k=-1` shrinks (difference) by adding/subtracting the other
    /// body's semi-axes. Valid for axis-aligned-relative ellipsoidal
    /// bodies; used as the closed-form fallback named in
    /// [`spec.md` §4.B].
    pub fn mink_sum_axes(&self, other_semi_axes: [f64; 2], k: i32) -> [f64; 2] {
        let sign = k as f64;
        [
            (self.semi_axes[0] + sign * other_semi_axes[0]).max(1e-9),
            (self.semi_axes[1] + sign * other_semi_axes[1]).max(1e-9),
        ]
    }
}

pub(crate) fn rotation2_from_matrix(m: Matrix2<f64>) -> Rotation2<f64> {
    let mut cols = m;
    if cols.determinant() < 0.0 {
        let c1 = -cols.column(1).into_owned();
        cols.set_column(1, &c1);
    }
    let angle = cols.column(0).y.atan2(cols.column(0).x);
    Rotation2::new(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_axes() {
        assert!(SuperEllipse::new([0.0, 1.0], 1.0, Vector2::zeros(), 0.0, 50).is_err());
    }

    #[test]
    fn rejects_out_of_range_eps() {
        assert!(SuperEllipse::new([1.0, 1.0], 2.0, Vector2::zeros(), 0.0, 50).is_err());
    }

    #[test]
    fn resampling_is_pure() {
        let e = SuperEllipse::new([2.0, 1.0], 1.0, Vector2::new(1.0, 2.0), 0.3, 64).unwrap();
        let a = e.surface_samples();
        let b = e.surface_samples();
        assert_eq!(a, b);
    }

    #[test]
    fn circle_samples_lie_on_radius() {
        let e = SuperEllipse::new([2.0, 2.0], 1.0, Vector2::zeros(), 0.0, 64).unwrap();
        let pts = e.surface_samples();
        for c in pts.column_iter() {
            assert!((c.norm() - 2.0).abs() < 1e-9);
        }
    }
}
