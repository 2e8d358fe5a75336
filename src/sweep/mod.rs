//! Finding all the intersections between a collection of line segments.
//!
//! This is a Bentley-Ottmann sweep: a vertical sweep-line moves from left to
//! right, stopping at every segment endpoint and at every crossing point it
//! discovers along the way. The segments currently crossing the sweep-line
//! are kept in a B-tree, ordered from bottom to top, and only segments that
//! are neighbors in that order are ever tested against one another. That
//! makes the whole thing `O((n + k) log n)` for `n` segments and `k`
//! intersections.
//!
//! Before sweeping, every coordinate is rounded to a lattice of
//! `10^-decimals` (see [`SweepOptions::decimals`]). All the decisions that
//! matter (does this pair cross? in which order do these segments leave this
//! point?) are then made with exact integer arithmetic.

mod crossing;
mod event_queue;
mod sweep_line;

use crate::{
    geom::Point,
    segments::{SegIdx, Segments},
    Error,
};

/// A point where two or more segments meet.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct IntersectionPoint {
    /// The location, in user units (rounded to the lattice if it's an
    /// endpoint, but crossing points can be anywhere).
    pub point: Point,
    /// All the segments passing through this point, sorted.
    pub segments: Vec<SegIdx>,
}

/// Options for [`intersect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    /// Coordinates are rounded to this many decimal places before sweeping.
    pub decimals: u32,
    /// If true, two segments that are neighbors in a contour don't count as
    /// intersecting at the vertex they share. They're still reported if they
    /// meet somewhere else, or if some other segment passes through the vertex.
    pub ignore_adjacent: bool,
    /// Give up with [`Error::EventBudgetExceeded`] after processing this many events.
    pub max_events: Option<usize>,
}

impl Default for SweepOptions {
    fn default() -> Self {
        SweepOptions {
            decimals: 3,
            ignore_adjacent: true,
            max_events: None,
        }
    }
}

/// Finds all the points where segments in `segments` touch, cross, or overlap.
///
/// Crossings and touches produce one point each. Collinear segments that
/// overlap produce a point at each end of the overlap. The points come out in
/// sweep order: by `x` coordinate, and then by `y` coordinate.
///
/// Errors out on non-finite coordinates, on coordinates too big for the
/// requested lattice, when the event budget runs out, and if the sweep
/// gets itself into an inconsistent state. The last one can usually be fixed
/// by rounding more coarsely.
pub fn intersect(
    segments: &Segments,
    opts: &SweepOptions,
) -> Result<Vec<IntersectionPoint>, Error> {
    tracing::trace!(segments = segments.len(), ?opts, "starting sweep");
    sweep_line::Sweeper::new(segments, opts)?.run()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::num::{orient, GridPoint};

    fn points(out: &[IntersectionPoint]) -> Vec<Point> {
        out.iter().map(|i| i.point).collect()
    }

    fn independent(segs: &[((f64, f64), (f64, f64))]) -> Segments {
        let mut ret = Segments::default();
        for &(p, q) in segs {
            ret.add_points([p, q]);
        }
        ret
    }

    #[test]
    fn plus_sign() {
        let segs = independent(&[((0.0, 0.0), (10.0, 0.0)), ((5.0, -5.0), (5.0, 5.0))]);
        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        insta::assert_debug_snapshot!(points(&out), @r"
        [
            (5.0, 0.0),
        ]
        ");
        assert_eq!(out[0].segments, vec![SegIdx(0), SegIdx(1)]);
    }

    #[test]
    fn collinear_overlap() {
        let segs = independent(&[((0.0, 0.0), (10.0, 0.0)), ((5.0, 0.0), (15.0, 0.0))]);
        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        insta::assert_debug_snapshot!(points(&out), @r"
        [
            (5.0, 0.0),
            (10.0, 0.0),
        ]
        ");
    }

    #[test]
    fn square_and_diagonal() {
        let mut segs = Segments::default();
        segs.add_cycle([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        segs.add_points([(0.0, 0.0), (10.0, 10.0)]);

        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        assert_eq!(
            points(&out),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
        );
        assert_eq!(out[0].segments, vec![SegIdx(0), SegIdx(3), SegIdx(4)]);

        // Without ignoring adjacency, every corner of the square counts.
        let opts = SweepOptions {
            ignore_adjacent: false,
            ..SweepOptions::default()
        };
        let out = intersect(&segs, &opts).unwrap();
        assert_eq!(
            points(&out),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]
        );
    }

    #[test]
    fn adjacent_segments() {
        let mut segs = Segments::default();
        segs.add_points([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(intersect(&segs, &SweepOptions::default())
            .unwrap()
            .is_empty());

        let opts = SweepOptions {
            ignore_adjacent: false,
            ..SweepOptions::default()
        };
        assert_eq!(
            points(&intersect(&segs, &opts).unwrap()),
            vec![Point::new(1.0, 1.0)]
        );
    }

    #[test]
    fn folding_back_on_itself() {
        // Neighbors that overlap away from their shared vertex do intersect.
        let mut segs = Segments::default();
        segs.add_points([(0.0, 0.0), (10.0, 0.0), (5.0, 0.0)]);
        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        assert_eq!(points(&out), vec![Point::new(5.0, 0.0)]);
    }

    #[test]
    fn bowtie() {
        let mut segs = Segments::default();
        segs.add_cycle([(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        assert_eq!(points(&out), vec![Point::new(5.0, 5.0)]);
        assert_eq!(out[0].segments, vec![SegIdx(0), SegIdx(2)]);
    }

    #[test]
    fn many_through_one_point() {
        let segs = independent(&[
            ((-1.0, -1.0), (1.0, 1.0)),
            ((-1.0, 1.0), (1.0, -1.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
            ((0.0, -1.0), (0.0, 1.0)),
        ]);
        let out = intersect(&segs, &SweepOptions::default()).unwrap();
        assert_eq!(points(&out), vec![Point::new(0.0, 0.0)]);
        assert_eq!(out[0].segments.len(), 4);
    }

    #[test]
    fn empty() {
        assert_eq!(
            intersect(&Segments::default(), &SweepOptions::default()).unwrap(),
            vec![]
        );
    }

    #[test]
    fn errors() {
        let segs = independent(&[((0.0, 0.0), (f64::NAN, 1.0))]);
        assert_matches!(
            intersect(&segs, &SweepOptions::default()),
            Err(Error::NonFinite)
        );

        let segs = independent(&[((0.0, 0.0), (1e12, 1.0))]);
        assert_matches!(
            intersect(&segs, &SweepOptions::default()),
            Err(Error::PrecisionOverflow { decimals: 3 })
        );

        let segs = independent(&[((0.0, 0.0), (1.0, 1.0)), ((0.0, 1.0), (1.0, 0.0))]);
        let opts = SweepOptions {
            max_events: Some(2),
            ..SweepOptions::default()
        };
        assert_matches!(
            intersect(&segs, &opts),
            Err(Error::EventBudgetExceeded { budget: 2 })
        );
    }

    // All the intersection points, found by comparing every pair.
    fn brute_force(segs: &[((i64, i64), (i64, i64))]) -> Vec<Point> {
        let g = |(x, y): (i64, i64)| GridPoint { x, y };
        let on_segment = |p: GridPoint, a: GridPoint, b: GridPoint| {
            orient(a, b, p) == 0
                && a.x.min(b.x) <= p.x
                && p.x <= a.x.max(b.x)
                && a.y.min(b.y) <= p.y
                && p.y <= a.y.max(b.y)
        };
        let mut found = Vec::new();
        for (i, &(a0, a1)) in segs.iter().enumerate() {
            for &(b0, b1) in &segs[i + 1..] {
                let (a0, a1, b0, b1) = (g(a0), g(a1), g(b0), g(b1));
                for (p, s0, s1) in [(a0, b0, b1), (a1, b0, b1), (b0, a0, a1), (b1, a0, a1)] {
                    if on_segment(p, s0, s1) {
                        found.push(p.to_f64());
                    }
                }
                let a = crossing::GridSeg::new(a0, a1).unwrap();
                let b = crossing::GridSeg::new(b0, b1).unwrap();
                found.extend(crossing::crossing_point(&a, &b));
            }
        }
        // Nearly-equal points needn't be adjacent after sorting, so dedup by hand.
        let mut ret: Vec<Point> = Vec::new();
        for p in found {
            if !ret.iter().any(|q| p.approx_eq(q, 1e-9)) {
                ret.push(p);
            }
        }
        ret.sort();
        ret
    }

    // Crossing points can come out a few ulps apart depending on which pair
    // of segments found them first, so compare them loosely.
    fn same_points(a: &[Point], b: &[Point]) -> bool {
        a.len() == b.len()
            && a.iter().all(|p| b.iter().any(|q| p.approx_eq(q, 1e-9)))
            && b.iter().all(|p| a.iter().any(|q| p.approx_eq(q, 1e-9)))
    }

    fn small_segment() -> impl Strategy<Value = ((i64, i64), (i64, i64))> {
        ((0i64..10, 0i64..10), (0i64..10, 0i64..10)).prop_filter("degenerate", |(p, q)| p != q)
    }

    proptest! {
        #[test]
        fn matches_brute_force(segs in proptest::collection::vec(small_segment(), 1..12)) {
            let f = |(x, y): (i64, i64)| (x as f64, y as f64);
            let arena = independent(
                &segs.iter().map(|&(p, q)| (f(p), f(q))).collect::<Vec<_>>(),
            );
            let opts = SweepOptions { decimals: 0, ignore_adjacent: false, max_events: None };
            let found = points(&intersect(&arena, &opts).unwrap());
            let expected = brute_force(&segs);
            prop_assert!(same_points(&found, &expected), "{:?} vs {:?}", found, expected);
        }

        #[test]
        fn input_order_does_not_matter(segs in proptest::collection::vec(small_segment(), 1..12)) {
            let f = |(x, y): (i64, i64)| (x as f64, y as f64);
            let forward: Vec<_> = segs.iter().map(|&(p, q)| (f(p), f(q))).collect();
            let backward: Vec<_> = forward.iter().rev().map(|&(p, q)| (q, p)).collect();
            let opts = SweepOptions { decimals: 0, ignore_adjacent: false, max_events: None };
            let a = points(&intersect(&independent(&forward), &opts).unwrap());
            let b = points(&intersect(&independent(&backward), &opts).unwrap());
            prop_assert!(same_points(&a, &b), "{:?} vs {:?}", a, b);
        }
    }
}
