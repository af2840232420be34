//! Quaternion/angle interpolation shared by the TFE fitter ([`spec.md`
//! §4.A, "TFE"]) and bridge-layer transition validation ([`spec.md`
//! §4.G]).

use nalgebra::UnitQuaternion;

/// `n_step` equispaced slerp samples from `a` to `b` inclusive
/// (`interpolated[0] == a`, `interpolated[n_step-1] == b`).
pub fn interpolate_quaternion(a: UnitQuaternion<f64>, b: UnitQuaternion<f64>, n_step: usize) -> Vec<UnitQuaternion<f64>> {
    assert!(n_step >= 2, "need at least two interpolation steps");
    (0..n_step)
        .map(|i| {
            let t = i as f64 / (n_step - 1) as f64;
            a.slerp(&b, t)
        })
        .collect()
}

/// `n_step` equispaced interpolation samples between two planar angles,
/// taking the shortest angular path (the 2D analogue of slerp on the
/// circle group).
pub fn interpolate_angle(a: f64, b: f64, n_step: usize) -> Vec<f64> {
    assert!(n_step >= 2, "need at least two interpolation steps");
    let delta = (b - a).sin().atan2((b - a).cos());
    (0..n_step).map(|i| a + delta * i as f64 / (n_step - 1) as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_endpoints_match_inputs() {
        let a = UnitQuaternion::identity();
        let b = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let steps = interpolate_quaternion(a, b, 5);
        assert!((steps[0].angle_to(&a)).abs() < 1e-9);
        assert!((steps[4].angle_to(&b)).abs() < 1e-9);
    }

    #[test]
    fn angle_interpolation_takes_shortest_path() {
        let steps = interpolate_angle(3.0, -3.0, 3);
        // shortest path from 3.0 to -3.0 wraps through +-pi, so the
        // midpoint should be near +-pi rather than 0.
        assert!(steps[1].abs() > 2.5);
    }
}
