//! Sweep-line rasterisation and decomposition enhancement
//! ([`spec.md` §4.E]).
//!
//! The boundary of each arena/obstacle shape is a closed curve; crossing
//! it with a sweep line yields an even number of `x` (or `z`, in the
//! nested 3D case) intercepts, which pair up consecutively (sorted) into
//! the same left/right half-curve intervals the boundary's left and
//! right chains would give directly. Using the exact horizontal-line
//! intersection rather than nearest-sample lookup on a finite parameter
//! grid is a deliberate simplification over the original algorithm: it
//! evaluates the same crossing exactly instead of approximating it from
//! the boundary's sample points.

use nalgebra::{Matrix2xX, Vector3};

use crate::geometry::intersect::{intersect_horizontal_line_polygon, intersect_vertical_line_mesh, Line3};
use crate::geometry::mesh::MeshMatrix;
use crate::interval::{self, Interval};
use crate::sweep::segment::{FreeSegment2D, FreeSegment3D};

fn crossings_to_intervals(ty: f64, boundaries: &[Matrix2xX<f64>]) -> Vec<Interval> {
    let mut out = Vec::new();
    for b in boundaries {
        let mut xs = intersect_horizontal_line_polygon(ty, b);
        if xs.len() < 2 {
            continue;
        }
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.chunks(2) {
            if pair.len() == 2 {
                out.push(Interval::new(pair[0], pair[1]));
            }
        }
    }
    out
}

/// Rasterise a 2D layer: for every `ty[i]`, intersect each arena/obstacle
/// boundary with the horizontal line, intersect the arena intervals
/// (the robot must stay inside every arena body simultaneously),
/// union the obstacle intervals (it must avoid all of them), and take
/// the complement to get the free intervals on that line.
pub fn compute_free_segment_2d(ty: &[f64], arena_boundaries: &[Matrix2xX<f64>], obstacle_boundaries: &[Matrix2xX<f64>]) -> FreeSegment2D {
    let mut seg = FreeSegment2D::with_lines(ty.to_vec());
    for (i, &line) in ty.iter().enumerate() {
        let domain = interval::intersect(&crossings_to_intervals(line, arena_boundaries));
        let holes = interval::union(&crossings_to_intervals(line, obstacle_boundaries));
        for free in interval::complement(&domain, &holes) {
            seg.x_l[i].push(free.s);
            seg.x_u[i].push(free.e);
            seg.x_m[i].push(0.5 * (free.s + free.e));
        }
    }
    seg
}

fn mesh_crossings_to_intervals(line: &Line3, meshes: &[MeshMatrix]) -> Vec<Interval> {
    let mut out = Vec::new();
    for m in meshes {
        let mut hits = intersect_vertical_line_mesh(line, m);
        if hits.len() < 2 {
            continue;
        }
        hits.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap());
        for pair in hits.chunks(2) {
            if pair.len() == 2 {
                out.push(Interval::new(pair[0].z, pair[1].z));
            }
        }
    }
    out
}

/// Nested 3D rasterisation: an outer sweep on `x` produces a
/// [`FreeSegment2D`] over `(y, z)` at each `t_x[i]`, by shooting a
/// vertical line in `z` through every `(t_x[i], t_y[j])` grid point.
pub fn compute_free_segment_3d(tx: &[f64], ty: &[f64], arena_meshes: &[MeshMatrix], obstacle_meshes: &[MeshMatrix]) -> FreeSegment3D {
    let cell_yz = tx
        .iter()
        .map(|&x| {
            let mut seg = FreeSegment2D::with_lines(ty.to_vec());
            for (j, &y) in ty.iter().enumerate() {
                let line = Line3 { origin: Vector3::new(x, y, 0.0), dir: Vector3::new(0.0, 0.0, 1.0) };
                let domain = interval::intersect(&mesh_crossings_to_intervals(&line, arena_meshes));
                let holes = interval::union(&mesh_crossings_to_intervals(&line, obstacle_meshes));
                for free in interval::complement(&domain, &holes) {
                    seg.x_l[j].push(free.s);
                    seg.x_u[j].push(free.e);
                    seg.x_m[j].push(0.5 * (free.s + free.e));
                }
            }
            seg
        })
        .collect();
    FreeSegment3D { tx: tx.to_vec(), cell_yz }
}

/// Insert pinch-vertex columns between adjacent sweep lines: wherever a
/// cell's midpoint on one line falls strictly inside a cell on the next
/// line (or vice versa), record the touching boundary so both lines gain
/// a shared, traversable column. Re-sorts every line's arrays when done.
pub fn enhance_decomposition(seg: &mut FreeSegment2D) {
    let n = seg.num_lines();
    if n < 2 {
        return;
    }
    let mut additions: Vec<Vec<f64>> = vec![Vec::new(); n];
    for i in 0..n - 1 {
        let len1 = seg.x_m[i].len();
        let len2 = seg.x_m[i + 1].len();
        for j1 in 0..len1 {
            let (xm1, xl1, xu1) = (seg.x_m[i][j1], seg.x_l[i][j1], seg.x_u[i][j1]);
            for j2 in 0..len2 {
                let (xm2, xl2, xu2) = (seg.x_m[i + 1][j2], seg.x_l[i + 1][j2], seg.x_u[i + 1][j2]);
                if xm1 < xl2 && xu1 >= xl2 {
                    additions[i].push(xl2);
                } else if xm1 > xu2 && xl1 <= xu2 {
                    additions[i].push(xu2);
                }
                if xm2 < xl1 && xu2 >= xl1 {
                    additions[i + 1].push(xl1);
                } else if xm2 > xu1 && xl2 <= xu1 {
                    additions[i + 1].push(xu1);
                }
            }
        }
    }
    for (i, adds) in additions.into_iter().enumerate() {
        for v in adds {
            seg.x_l[i].push(v);
            seg.x_u[i].push(v);
            seg.x_m[i].push(v);
        }
        sort_triplet(&mut seg.x_l[i], &mut seg.x_u[i], &mut seg.x_m[i]);
    }
}

/// Enhance every `(y, z)` slice of a 3D decomposition independently.
pub fn enhance_decomposition_3d(seg: &mut FreeSegment3D) {
    for slice in &mut seg.cell_yz {
        enhance_decomposition(slice);
    }
}

fn sort_triplet(l: &mut [f64], u: &mut [f64], m: &mut [f64]) {
    l.sort_by(|a, b| a.partial_cmp(b).unwrap());
    u.sort_by(|a, b| a.partial_cmp(b).unwrap());
    m.sort_by(|a, b| a.partial_cmp(b).unwrap());
}
