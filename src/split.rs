//! Cutting segments at their intersection points.

use crate::{
    geom::{Point, Segment, SegmentMeta},
    options::TrimScope,
    segments::{SegIdx, Segments},
    sweep::IntersectionPoint,
    Error,
};

/// One of the pieces that a segment gets cut into.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrimPiece {
    /// Where the piece starts.
    pub start: Point,
    /// Where the piece ends.
    pub end: Point,
    /// Does at least one end of this piece touch an intersection point?
    pub intersected: bool,
    /// Inherited from the segment this piece was cut from.
    pub meta: SegmentMeta,
}

impl TrimPiece {
    /// The length of this piece.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// All the pieces of one segment, ordered from the segment's start to its end.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrimGroup {
    /// The segment that was cut.
    pub seg: SegIdx,
    /// The pieces. Consecutive pieces share their common endpoint exactly.
    pub pieces: Vec<TrimPiece>,
}

/// Cuts `segment` at every one of `points` that lies within `snap_tolerance` of it.
///
/// Points are snapped onto the segment. Cuts that are closer together than
/// the tolerance get merged, and cuts within the tolerance of an endpoint
/// don't cut anything but they do mark the pieces touching that endpoint as
/// intersected.
///
/// The first piece starts exactly at `segment.start` and the last one ends
/// exactly at `segment.end`.
pub fn split<'a>(
    seg: SegIdx,
    segment: &Segment,
    points: impl IntoIterator<Item = &'a Point>,
    snap_tolerance: f64,
) -> TrimGroup {
    let len = segment.length();
    let mut start_touched = false;
    let mut end_touched = false;
    let mut cuts = Vec::new();

    for p in points {
        let (t, dist) = segment.project(p);
        if dist > snap_tolerance {
            continue;
        }
        let along = t * len;
        if along <= snap_tolerance {
            start_touched = true;
        } else if len - along <= snap_tolerance {
            end_touched = true;
        } else {
            cuts.push(t);
        }
    }

    cuts.sort_by(f64::total_cmp);
    let mut merged: Vec<f64> = Vec::with_capacity(cuts.len());
    for t in cuts {
        if merged.last().map_or(true, |&prev| (t - prev) * len > snap_tolerance) {
            merged.push(t);
        }
    }

    let mut boundaries = Vec::with_capacity(merged.len() + 2);
    boundaries.push(segment.start);
    boundaries.extend(merged.iter().map(|&t| segment.eval(t)));
    boundaries.push(segment.end);

    let cut = !merged.is_empty();
    let last = boundaries.len() - 2;
    let pieces = boundaries
        .windows(2)
        .enumerate()
        .map(|(i, w)| TrimPiece {
            start: w[0],
            end: w[1],
            intersected: cut || (i == 0 && start_touched) || (i == last && end_touched),
            meta: segment.meta.clone(),
        })
        .collect();

    TrimGroup { seg, pieces }
}

/// Intersection points sorted by `x`, for finding the ones near a segment.
struct PointIndex<'a> {
    points: Vec<&'a Point>,
}

impl<'a> PointIndex<'a> {
    fn new(intersections: &'a [IntersectionPoint]) -> Self {
        let mut points: Vec<_> = intersections.iter().map(|i| &i.point).collect();
        points.sort();
        PointIndex { points }
    }

    /// All the points in the bounding box of `seg`, padded by `pad`.
    fn near(&self, seg: &Segment, pad: f64) -> impl Iterator<Item = &'a Point> + '_ {
        let (x0, x1) = (seg.start.x.min(seg.end.x) - pad, seg.start.x.max(seg.end.x) + pad);
        let (y0, y1) = (seg.start.y.min(seg.end.y) - pad, seg.start.y.max(seg.end.y) + pad);
        let first = self.points.partition_point(|p| p.x < x0);
        self.points[first..]
            .iter()
            .copied()
            .take_while(move |p| p.x <= x1)
            .filter(move |p| y0 <= p.y && p.y <= y1)
    }
}

/// Cuts every segment in `scope` at the intersection points near it.
///
/// Segments outside the scope don't get a group at all. Groups come out in
/// segment order.
pub fn split_all(
    segments: &Segments,
    intersections: &[IntersectionPoint],
    snap_tolerance: f64,
    scope: TrimScope,
) -> Result<Vec<TrimGroup>, Error> {
    if !(snap_tolerance.is_finite() && snap_tolerance > 0.0) {
        return Err(Error::InvalidConfig {
            field: "snap_tolerance",
            reason: format!("must be positive, got {snap_tolerance}"),
        });
    }

    let index = PointIndex::new(intersections);
    let groups: Vec<_> = segments
        .indices()
        .filter(|&idx| scope.includes(&segments[idx].meta))
        .map(|idx| {
            let seg = &segments[idx];
            split(idx, seg, index.near(seg, snap_tolerance), snap_tolerance)
        })
        .collect();

    tracing::debug!(
        groups = groups.len(),
        pieces = groups.iter().map(|g| g.pieces.len()).sum::<usize>(),
        "split segments"
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::{contour::ContourIdx, num::tests::Reasonable};

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(
            Point::new(x0, y0),
            Point::new(x1, y1),
            SegmentMeta::plain(ContourIdx(0)),
        )
    }

    fn ends(g: &TrimGroup) -> Vec<(Point, Point, bool)> {
        g.pieces
            .iter()
            .map(|p| (p.start, p.end, p.intersected))
            .collect()
    }

    #[test]
    fn no_cuts() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        let g = split(SegIdx(0), &s, &[Point::new(5.0, 3.0)], 0.1);
        assert_eq!(
            ends(&g),
            vec![(Point::new(0.0, 0.0), Point::new(10.0, 0.0), false)]
        );
    }

    #[test]
    fn cut_in_the_middle() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        // Slightly off the segment, so it gets snapped.
        let g = split(SegIdx(0), &s, &[Point::new(4.0, 0.05)], 0.1);
        insta::assert_debug_snapshot!(ends(&g), @r"
        [
            (
                (0.0, 0.0),
                (4.0, 0.0),
                true,
            ),
            (
                (4.0, 0.0),
                (10.0, 0.0),
                true,
            ),
        ]
        ");
    }

    #[test]
    fn cuts_are_sorted_and_merged() {
        let s = seg(10.0, 0.0, 0.0, 0.0);
        let points = [
            Point::new(2.0, 0.0),
            Point::new(7.0, 0.0),
            Point::new(7.05, 0.0),
            Point::new(2.0, 0.0),
        ];
        let g = split(SegIdx(3), &s, &points, 0.1);
        assert_eq!(g.seg, SegIdx(3));
        let cuts: Vec<_> = g.pieces.iter().map(|p| p.end).collect();
        assert_eq!(cuts.len(), 3);
        assert!(cuts[0].approx_eq(&Point::new(7.05, 0.0), 1e-9));
        assert!(cuts[1].approx_eq(&Point::new(2.0, 0.0), 1e-9));
        assert_eq!(cuts[2], Point::new(0.0, 0.0));
    }

    #[test]
    fn touching_an_endpoint() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        let g = split(SegIdx(0), &s, &[Point::new(10.05, 0.0)], 0.1);
        assert_eq!(
            ends(&g),
            vec![(Point::new(0.0, 0.0), Point::new(10.0, 0.0), true)]
        );
    }

    #[test]
    fn scope_and_validation() {
        let mut segs = Segments::default();
        segs.add_points([(0.0, 0.0), (10.0, 0.0)]);
        segs.add_cycle([(5.0, -5.0), (5.0, 5.0), (6.0, 5.0)]);
        let points = [IntersectionPoint {
            point: Point::new(5.0, 0.0),
            segments: vec![SegIdx(0), SegIdx(1)],
        }];

        let all = split_all(&segs, &points, 0.1, TrimScope::Both).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].pieces.len(), 2);
        assert_eq!(all[1].pieces.len(), 2);
        assert_eq!(all[2].pieces.len(), 1);

        let open = split_all(&segs, &points, 0.1, TrimScope::Open).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].seg, SegIdx(0));

        let closed = split_all(&segs, &points, 0.1, TrimScope::Closed).unwrap();
        assert_eq!(
            closed.iter().map(|g| g.seg).collect::<Vec<_>>(),
            vec![SegIdx(1), SegIdx(2), SegIdx(3)]
        );

        assert_matches!(
            split_all(&segs, &points, 0.0, TrimScope::Both),
            Err(Error::InvalidConfig {
                field: "snap_tolerance",
                ..
            })
        );
    }

    proptest! {
        #[test]
        fn pieces_reconstruct_the_segment(
            (start, end) in <((f64, f64), (f64, f64))>::reasonable(),
            ts in proptest::collection::vec(0.0f64..=1.0, 0..8),
        ) {
            let s = Segment::new(start.into(), end.into(), SegmentMeta::plain(ContourIdx(0)));
            let points: Vec<Point> = ts.iter().map(|&t| s.eval(t)).collect();
            let g = split(SegIdx(0), &s, &points, 0.1);

            prop_assert_eq!(g.pieces[0].start, s.start);
            prop_assert_eq!(g.pieces.last().unwrap().end, s.end);
            for w in g.pieces.windows(2) {
                prop_assert_eq!(w[0].end, w[1].start);
            }
            let total: f64 = g.pieces.iter().map(TrimPiece::length).sum();
            prop_assert!((total - s.length()).abs() <= 1e-9 * s.length().max(1.0));
            if g.pieces.len() > 1 {
                prop_assert!(g.pieces.iter().all(|p| p.intersected && p.length() > 0.1 - 1e-6));
            }
        }
    }
}
