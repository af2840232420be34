//! Free-segment data types ([`spec.md` §3]).

/// Free segments along a sweep line, indexed by sweep coordinate `ty[i]`.
/// `x_l[i]`/`x_u[i]` are the lower/upper bounds of each free interval on
/// line `i`; `x_m[i]` is their midpoint. All three are kept the same
/// length and ascending-sorted per line.
#[derive(Clone, Debug, Default)]
pub struct FreeSegment2D {
    pub ty: Vec<f64>,
    pub x_l: Vec<Vec<f64>>,
    pub x_u: Vec<Vec<f64>>,
    pub x_m: Vec<Vec<f64>>,
}

impl FreeSegment2D {
    pub fn with_lines(ty: Vec<f64>) -> Self {
        let n = ty.len();
        FreeSegment2D { ty, x_l: vec![Vec::new(); n], x_u: vec![Vec::new(); n], x_m: vec![Vec::new(); n] }
    }

    pub fn num_lines(&self) -> usize {
        self.ty.len()
    }

    /// `isPtInCFLine`-equivalent: snap `y` to the nearest sweep line,
    /// then test whether `x` falls inside one of that line's free
    /// intervals. Empty decompositions never contain a point.
    pub fn contains(&self, y: f64, x: f64) -> bool {
        if self.ty.is_empty() {
            return false;
        }
        let i = (0..self.ty.len())
            .min_by(|&a, &b| (self.ty[a] - y).abs().partial_cmp(&(self.ty[b] - y).abs()).unwrap())
            .unwrap();
        (0..self.x_l[i].len()).any(|j| x >= self.x_l[i][j] && x <= self.x_u[i][j])
    }
}

/// Nested 3D decomposition: an outer sweep on `x` produces a
/// [`FreeSegment2D`] over `(y, z)` at each `t_x[i]`.
#[derive(Clone, Debug, Default)]
pub struct FreeSegment3D {
    pub tx: Vec<f64>,
    pub cell_yz: Vec<FreeSegment2D>,
}

impl FreeSegment3D {
    pub fn num_slices(&self) -> usize {
        self.tx.len()
    }

    /// Snap `x` to the nearest outer slice, then test `(y, z)` against
    /// that slice's `(y, z)` decomposition.
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        if self.tx.is_empty() {
            return false;
        }
        let i = (0..self.tx.len())
            .min_by(|&a, &b| (self.tx[a] - x).abs().partial_cmp(&(self.tx[b] - x).abs()).unwrap())
            .unwrap();
        self.cell_yz[i].contains(y, z)
    }
}
