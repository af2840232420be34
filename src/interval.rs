//! Interval algebra over closed real intervals ([`spec.md` §4.D]).
//!
//! Every operation preserves the disjoint-sorted invariant: a "union"
//! (in the type sense) of [`Interval`] is a `Vec<Interval>` sorted
//! ascending by `s` with no two elements overlapping or touching.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub s: f64,
    pub e: f64,
}

impl Interval {
    pub fn new(s: f64, e: f64) -> Self {
        debug_assert!(s <= e, "interval must satisfy s <= e: [{}, {}]", s, e);
        Interval { s, e }
    }

    pub fn len(&self) -> f64 {
        self.e - self.s
    }

    fn touches_or_overlaps(&self, other: &Interval) -> bool {
        self.s <= other.e && other.s <= self.e
    }
}

/// Merge a list of (possibly overlapping/unsorted) intervals into a
/// disjoint, ascending-sorted union.
pub fn union(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }
    let mut sorted: Vec<Interval> = intervals.to_vec();
    sorted.sort_by(|a, b| a.s.partial_cmp(&b.s).unwrap());

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    let mut cur = sorted[0];
    for iv in sorted.into_iter().skip(1) {
        if cur.touches_or_overlaps(&iv) {
            cur.e = cur.e.max(iv.e);
        } else {
            merged.push(cur);
            cur = iv;
        }
    }
    merged.push(cur);
    merged
}

/// Fold the intervals down to their pairwise intersection, dropping
/// empty results. For a single interval this is the identity; for
/// disjoint inputs the result is empty.
pub fn intersect(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }
    let mut acc = intervals[0];
    for iv in intervals.iter().skip(1) {
        let s = acc.s.max(iv.s);
        let e = acc.e.min(iv.e);
        if s > e {
            return Vec::new();
        }
        acc = Interval::new(s, e);
    }
    vec![acc]
}

/// `domain \ holes`, where `domain` is itself a (disjoint) union and
/// `holes` is a disjoint union (the caller typically passes the result
/// of [`union`]).
pub fn complement(domain: &[Interval], holes: &[Interval]) -> Vec<Interval> {
    let holes = union(holes);
    let mut out = Vec::new();
    for d in domain {
        let mut cursor = d.s;
        for h in holes.iter().filter(|h| h.touches_or_overlaps(d) || (h.s >= d.s && h.e <= d.e)) {
            let hs = h.s.max(d.s);
            let he = h.e.min(d.e);
            if hs > he {
                continue;
            }
            if hs > cursor {
                out.push(Interval::new(cursor, hs));
            }
            cursor = cursor.max(he);
        }
        if cursor < d.e {
            out.push(Interval::new(cursor, d.e));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: f64, e: f64) -> Interval {
        Interval::new(s, e)
    }

    #[test]
    fn union_merges_overlapping_and_touching() {
        let r = union(&[iv(1.0, 3.0), iv(2.0, 4.0), iv(6.0, 7.0)]);
        assert_eq!(r, vec![iv(1.0, 4.0), iv(6.0, 7.0)]);
    }

    #[test]
    fn complement_splits_domain_around_holes() {
        let r = complement(&[iv(0.0, 10.0)], &[iv(2.0, 3.0), iv(5.0, 7.0)]);
        assert_eq!(r, vec![iv(0.0, 2.0), iv(3.0, 5.0), iv(7.0, 10.0)]);
    }

    #[test]
    fn intersect_of_disjoint_is_empty() {
        assert!(intersect(&[iv(0.0, 1.0), iv(2.0, 3.0)]).is_empty());
    }

    #[test]
    fn union_is_idempotent() {
        let a = union(&[iv(1.0, 3.0), iv(2.0, 4.0), iv(6.0, 7.0)]);
        let b = union(&a);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_obstacle_list_free_equals_arena() {
        let arena = intersect(&[iv(-10.0, 10.0)]);
        let free = complement(&arena, &[]);
        assert_eq!(free, vec![iv(-10.0, 10.0)]);
    }

    #[test]
    fn complement_covers_domain_when_reunioned_with_holes() {
        let domain = [iv(0.0, 10.0)];
        let holes = union(&[iv(2.0, 3.0), iv(5.0, 7.0)]);
        let free = complement(&domain, &holes);
        let mut all: Vec<Interval> = free.clone();
        all.extend(holes.iter().cloned());
        let back = union(&all);
        // Reconstituting free ∪ holes must cover the domain (up to
        // interval boundaries touching rather than overlapping).
        let total_len: f64 = back.iter().map(|i| i.len()).sum();
        assert!((total_len - 10.0).abs() < 1e-9);
    }
}
