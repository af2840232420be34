//! Minimum Volume Concentric Ellipsoid (MVCE) and Tightly-Fitted
//! Ellipsoid (TFE) fitting ([`spec.md` §4.A]).
//!
//! `MVCE(a, b, orientation_a, orientation_b)` finds the smallest
//! ellipsoid concentric with `b` (at `orientation_b`) that contains the
//! ellipsoid `a` rotated to `orientation_a`: shrink to a sphere under
//! `b`'s frame, eigen-fit in the shrunk space, stretch back. `TFE` folds
//! a sequence of slerp-interpolated orientations into the MVCE
//! iteratively so the result bounds every rotated copy of the body as it
//! sweeps from `orientation_a` to `orientation_b`.

use nalgebra::{Matrix2, Matrix3, Rotation2, SymmetricEigen, UnitQuaternion, Vector2, Vector3};

use crate::geometry::quaternion::{interpolate_angle, interpolate_quaternion};
use crate::geometry::superellipse::SuperEllipse;
use crate::geometry::superquadric::SuperQuadric;

fn proper_rotation2(mut m: Matrix2<f64>) -> Rotation2<f64> {
    if m.determinant() < 0.0 {
        let c1 = -m.column(1).into_owned();
        m.set_column(1, &c1);
    }
    Rotation2::new(m.column(0).y.atan2(m.column(0).x))
}

fn proper_rotation3(mut m: Matrix3<f64>) -> UnitQuaternion<f64> {
    if m.determinant() < 0.0 {
        let c2 = -m.column(2).into_owned();
        m.set_column(2, &c2);
    }
    UnitQuaternion::from_rotation_matrix(&nalgebra::Rotation3::from_matrix_unchecked(m))
}

/// Minimum-volume ellipse (2D), semi-axes `a` at `theta_a` enclosed
/// together with a reference ellipse of semi-axes `b` at `theta_b`,
/// result concentric with the reference (origin-centred).
pub fn mvce_2d(a: [f64; 2], b: [f64; 2], theta_a: f64, theta_b: f64, num: usize) -> SuperEllipse {
    let r = b[0].min(b[1]);
    let diag = Matrix2::from_diagonal(&Vector2::new(r / b[0], r / b[1]));
    let diag_a = Matrix2::from_diagonal(&Vector2::new(a[0].powi(-2), a[1].powi(-2)));

    let rb = Rotation2::new(theta_b).into_inner();
    let ra = Rotation2::new(theta_a).into_inner();

    let t = rb * diag * rb.transpose();
    let t_inv = t.try_inverse().unwrap_or_else(Matrix2::identity);

    let ap = t_inv * (ra * diag_a * ra.transpose()) * t_inv;
    let eig = SymmetricEigen::new(ap);
    let a_p = eig.eigenvalues.map(|v| v.max(1e-300).powf(-0.5));
    let c_p = Vector2::new(a_p.x.max(r), a_p.y.max(r));

    let diag_c = Matrix2::from_diagonal(&c_p.map(|v| v.powi(-2)));
    let u = eig.eigenvectors;
    let c = t * u * diag_c * u.transpose() * t;

    let eig_c = SymmetricEigen::new(c);
    let semi_axes = eig_c.eigenvalues.map(|v| v.max(1e-300).powf(-0.5));
    let rot = proper_rotation2(eig_c.eigenvectors);

    SuperEllipse::new([semi_axes.x, semi_axes.y], 1.0, Vector2::zeros(), rot.angle(), num)
        .expect("MVCE always produces finite positive axes")
}

/// 3D analogue of [`mvce_2d`].
pub fn mvce_3d(a: [f64; 3], b: [f64; 3], quat_a: UnitQuaternion<f64>, quat_b: UnitQuaternion<f64>, num: usize) -> SuperQuadric {
    let r = b[0].min(b[1]).min(b[2]);
    let diag = Matrix3::from_diagonal(&Vector3::new(r / b[0], r / b[1], r / b[2]));
    let diag_a = Matrix3::from_diagonal(&Vector3::new(a[0].powi(-2), a[1].powi(-2), a[2].powi(-2)));

    let rb = quat_b.to_rotation_matrix().into_inner();
    let ra = quat_a.to_rotation_matrix().into_inner();

    let t = rb * diag * rb.transpose();
    let t_inv = t.try_inverse().unwrap_or_else(Matrix3::identity);

    let ap = t_inv * (ra * diag_a * ra.transpose()) * t_inv;
    let eig = SymmetricEigen::new(ap);
    let a_p = eig.eigenvalues.map(|v| v.max(1e-300).powf(-0.5));
    let c_p = Vector3::new(a_p.x.max(r), a_p.y.max(r), a_p.z.max(r));

    let diag_c = Matrix3::from_diagonal(&c_p.map(|v| v.powi(-2)));
    let u = eig.eigenvectors;
    let c = t * u * diag_c * u.transpose() * t;

    let eig_c = SymmetricEigen::new(c);
    let semi_axes = eig_c.eigenvalues.map(|v| v.max(1e-300).powf(-0.5));
    let quat = proper_rotation3(eig_c.eigenvectors);

    SuperQuadric::new([semi_axes.x, semi_axes.y, semi_axes.z], [1.0, 1.0], Vector3::zeros(), quat, num)
        .expect("MVCE always produces finite positive axes")
}

/// Tightly-Fitted Ellipse: bounds an ellipse of semi-axes `a` as it
/// rotates from `theta_a` to `theta_b`.
pub fn tfe_2d(a: [f64; 2], theta_a: f64, theta_b: f64, n_step: usize, num: usize) -> SuperEllipse {
    let angles = interpolate_angle(theta_a, theta_b, n_step);
    let mut enclosed = mvce_2d(a, a, theta_a, theta_b, num);
    for angle in angles.iter().skip(1) {
        enclosed = mvce_2d(a, enclosed.semi_axes, *angle, enclosed.theta, num);
    }
    enclosed
}

/// Tightly-Fitted Ellipsoid: bounds a superquadric-fitted ellipsoid of
/// semi-axes `a` as it rotates from `quat_a` to `quat_b`.
pub fn tfe_3d(a: [f64; 3], quat_a: UnitQuaternion<f64>, quat_b: UnitQuaternion<f64>, n_step: usize, num: usize) -> SuperQuadric {
    let quats = interpolate_quaternion(quat_a, quat_b, n_step);
    let mut enclosed = mvce_3d(a, a, quat_a, quat_b, num);
    for quat in quats.iter().skip(1) {
        enclosed = mvce_3d(a, enclosed.semi_axes, *quat, enclosed.quat, num);
    }
    enclosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mvce_of_identical_spheres_is_the_sphere() {
        let e = mvce_3d([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], UnitQuaternion::identity(), UnitQuaternion::identity(), 10);
        assert_relative_eq!(e.semi_axes[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(e.semi_axes[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(e.semi_axes[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn mvce_of_identical_circles_2d_is_the_circle() {
        let e = mvce_2d([1.0, 1.0], [1.0, 1.0], 0.0, 0.0, 10);
        assert_relative_eq!(e.semi_axes[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(e.semi_axes[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn tfe_bounds_grow_with_wider_rotation_sweep() {
        let narrow = tfe_2d([2.0, 1.0], 0.0, 0.1, 4, 10);
        let wide = tfe_2d([2.0, 1.0], 0.0, 1.0, 4, 10);
        // A tighter sweep should never need a larger minor/major axis
        // than a wider one does.
        assert!(narrow.semi_axes[1] <= wide.semi_axes[1] + 1e-9);
    }

    #[test]
    fn tfe_3d_contains_both_endpoint_orientations_radius() {
        let a = [1.0, 1.0, 2.0];
        let qa = UnitQuaternion::identity();
        let qb = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_4);
        let e = tfe_3d(a, qa, qb, 5, 10);
        // The enclosing ellipsoid's smallest semi-axis must be at least
        // the smallest semi-axis of the original body.
        assert!(e.semi_axes.iter().cloned().fold(f64::INFINITY, f64::min) >= 1.0 - 1e-6);
    }
}
