//! Line/mesh and line/polygon intersection ([`spec.md` §4.A]).
//!
//! All routines here are total: a "no hit" result is an empty vector,
//! never a panic or an error, matching the propagation policy in
//! [`spec.md` §7] ("numeric non-finite during sweep ... filtered").

use nalgebra::{Vector2, Vector3};

use crate::geometry::mesh::MeshMatrix;

const TOL: f64 = 1e-12;

/// Parametric line `p(s) = origin + s * dir`.
#[derive(Clone, Copy, Debug)]
pub struct Line3 {
    pub origin: Vector3<f64>,
    pub dir: Vector3<f64>,
}

/// Line–triangle intersection, barycentric test with tolerance `TOL`.
pub fn intersect_line_triangle(line: &Line3, t0: Vector3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> Option<Vector3<f64>> {
    let n = u.cross(&v);
    let denom = n.dot(&line.dir);
    if denom.abs() < TOL || n.norm() < TOL {
        return None;
    }
    let num = n.dot(&(t0 - line.origin));
    let s_param = num / denom;
    let pt = line.origin + s_param * line.dir;

    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let vv = v.dot(&v);
    let w = pt - t0;
    let wu = u.dot(&w);
    let wv = v.dot(&w);
    let d = uv * uv - uu * vv;
    if d.abs() < TOL {
        return None;
    }

    let s = (uv * wv - vv * wu) / d;
    if s < -TOL || s > 1.0 + TOL {
        return None;
    }
    let t = (uv * wu - uu * wv) / d;
    if t < -TOL || s + t > 1.0 + TOL {
        return None;
    }
    Some(pt)
}

/// Up to two hit points of `line` against `mesh`.
pub fn intersect_line_mesh(line: &Line3, mesh: &MeshMatrix) -> Vec<Vector3<f64>> {
    let mut points = Vec::with_capacity(2);
    for face in &mesh.faces {
        let t0 = mesh.vertices.column(face[0] as usize).into_owned();
        let u = mesh.vertices.column(face[1] as usize).into_owned() - t0;
        let v = mesh.vertices.column(face[2] as usize).into_owned() - t0;
        if let Some(pt) = intersect_line_triangle(line, t0, u, v) {
            points.push(pt);
            if points.len() == 2 {
                break;
            }
        }
    }
    points
}

/// Same as [`intersect_line_mesh`] but for an axis-aligned vertical
/// sweep line (constant `x,y`), pruning faces whose `(x,y)` range
/// doesn't contain the line before doing the full triangle test.
pub fn intersect_vertical_line_mesh(line: &Line3, mesh: &MeshMatrix) -> Vec<Vector3<f64>> {
    let mut points = Vec::with_capacity(2);
    let (x0, y0) = (line.origin.x, line.origin.y);

    let xs = mesh.vertices.row(0);
    let ys = mesh.vertices.row(1);
    if x0 > xs.max() || x0 < xs.min() || y0 > ys.max() || y0 < ys.min() {
        return points;
    }

    for face in &mesh.faces {
        let vx = [
            mesh.vertices[(0, face[0] as usize)],
            mesh.vertices[(0, face[1] as usize)],
            mesh.vertices[(0, face[2] as usize)],
        ];
        let vy = [
            mesh.vertices[(1, face[0] as usize)],
            mesh.vertices[(1, face[1] as usize)],
            mesh.vertices[(1, face[2] as usize)],
        ];
        let (xmin, xmax) = (vx.iter().cloned().fold(f64::MAX, f64::min), vx.iter().cloned().fold(f64::MIN, f64::max));
        let (ymin, ymax) = (vy.iter().cloned().fold(f64::MAX, f64::min), vy.iter().cloned().fold(f64::MIN, f64::max));
        if x0 < xmin || x0 > xmax || y0 < ymin || y0 > ymax {
            continue;
        }

        let t0 = mesh.vertices.column(face[0] as usize).into_owned();
        let u = mesh.vertices.column(face[1] as usize).into_owned() - t0;
        let v = mesh.vertices.column(face[2] as usize).into_owned() - t0;
        if let Some(pt) = intersect_line_triangle(line, t0, u, v) {
            points.push(pt);
            if points.len() == 2 {
                break;
            }
        }
    }
    points
}

/// Horizontal line `y = ty` against a closed 2D polygon given as
/// ordered boundary points (`2 x N` matrix, edges wrap from the last
/// column to the first): one `x` intercept per crossing edge.
pub fn intersect_horizontal_line_polygon(ty: f64, shape: &nalgebra::Matrix2xX<f64>) -> Vec<f64> {
    let n = shape.ncols();
    let mut points = Vec::new();
    if n == 0 {
        return points;
    }
    let ys = shape.row(1);
    if ty > ys.max() || ty < ys.min() {
        return points;
    }

    for i in 0..n {
        let p1 = Vector2::new(shape[(0, i)], shape[(1, i)]);
        let j = if i == n - 1 { 0 } else { i + 1 };
        let p2 = Vector2::new(shape[(0, j)], shape[(1, j)]);

        if ty >= p1.y.min(p2.y) && ty <= p1.y.max(p2.y) && (p1.y - p2.y).abs() > TOL {
            let t = (ty - p2.y) / (p1.y - p2.y);
            if (0.0..=1.0).contains(&t) {
                points.push(t * p1.x + (1.0 - t) * p2.x);
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_ray_hits_unit_square_top_and_bottom() {
        let shape = nalgebra::Matrix2xX::from_columns(&[
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, -1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(-1.0, 1.0),
        ]);
        let mut xs = intersect_horizontal_line_polygon(0.0, &shape);
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs.len(), 2);
        assert!((xs[0] - (-1.0)).abs() < 1e-9);
        assert!((xs[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_line_has_no_hits() {
        let shape = nalgebra::Matrix2xX::from_columns(&[
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, -1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(-1.0, 1.0),
        ]);
        assert!(intersect_horizontal_line_polygon(5.0, &shape).is_empty());
    }

    #[test]
    fn line_mesh_hits_unit_sphere_twice() {
        use crate::geometry::SuperQuadric;
        use nalgebra::UnitQuaternion;
        let q = SuperQuadric::new([1.0, 1.0, 1.0], [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 24).unwrap();
        let mesh = MeshMatrix::from_quadric_grid(q.surface_samples(), 24);
        let line = Line3 { origin: Vector3::new(0.0, 0.0, -5.0), dir: Vector3::new(0.0, 0.0, 1.0) };
        let hits = intersect_line_mesh(&line, &mesh);
        assert_eq!(hits.len(), 2);
    }
}
