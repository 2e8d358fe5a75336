//! Geometric primitives, like points and lines.

use crate::contour::{Commands, ContourIdx, Style};
use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`, for the convenience of our sweep-line
/// algorithm (which moves in increasing `x`).
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Tolerance-based equality: are we within `tol` of `other`?
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.distance(other) <= tol
    }

    /// The Euclidean distance between two points.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Compute an affine combination between `self` and `other`; that is, `(1 - t) * self + t * other`.
    pub fn affine(&self, other: &Self, t: f64) -> Self {
        Point {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }

    /// Converts to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Where a segment came from.
///
/// Every segment (and every piece that splitting makes out of it) carries
/// one of these, so that results can be traced back to their contour and
/// drawn with its style.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SegmentMeta {
    /// The contour this segment was cut from.
    ///
    /// This is only a lookup key: the contour might have been removed from its
    /// table since.
    pub contour: ContourIdx,
    /// Which subpath (counting from zero) of the contour.
    pub subpath: usize,
    /// The position of this segment within its subpath's polyline.
    pub seq: usize,
    /// Was the subpath closed?
    pub closed: bool,
    /// Did the subpath contain any curves?
    pub curve: bool,
    /// Were the contour's commands absolute, relative or both?
    pub commands: Commands,
    /// The contour's style.
    pub style: Style,
}

impl SegmentMeta {
    /// Metadata for a standalone segment with an open, all-absolute, straight origin.
    pub fn plain(contour: ContourIdx) -> Self {
        SegmentMeta {
            contour,
            subpath: 0,
            seq: 0,
            closed: false,
            curve: false,
            commands: Commands::Absolute,
            style: Style::default(),
        }
    }
}

/// A straight line segment, in drawing order.
///
/// Unlike the sweep-line's internal view of a segment, `start` need not be
/// smaller than `end`.
#[derive(Clone, PartialEq)]
pub struct Segment {
    /// The first point.
    pub start: Point,
    /// The last point.
    pub end: Point,
    /// Where this segment came from.
    pub meta: SegmentMeta,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -- {:?}", self.start, self.end)
    }
}

impl Segment {
    /// Create a new segment.
    pub fn new(start: Point, end: Point, meta: SegmentMeta) -> Self {
        Segment { start, end, meta }
    }

    /// The length of this segment.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// The smaller of our two endpoints, in sweep order.
    pub fn min_point(&self) -> Point {
        self.start.min(self.end)
    }

    /// The larger of our two endpoints, in sweep order.
    pub fn max_point(&self) -> Point {
        self.start.max(self.end)
    }

    /// The point at parameter `t`, where `t = 0` is `start` and `t = 1` is `end`.
    pub fn eval(&self, t: f64) -> Point {
        self.start.affine(&self.end, t)
    }

    /// Projects `p` onto this segment.
    ///
    /// Returns the parameter of the closest point on the segment (so it's
    /// clamped to `[0, 1]`) and the distance from `p` to that closest point.
    pub fn project(&self, p: &Point) -> (f64, f64) {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return (0.0, self.start.distance(p));
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2).clamp(0.0, 1.0);
        (t, self.eval(t).distance(p))
    }

    /// Converts to a `kurbo` line.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.start.to_kurbo(), self.end.to_kurbo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(
            Point::new(x0, y0),
            Point::new(x1, y1),
            SegmentMeta::plain(ContourIdx(0)),
        )
    }

    #[test]
    fn sweep_order() {
        let mut points = vec![
            Point::new(1.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(0.0, -1.0),
        ];
        points.sort();
        insta::assert_debug_snapshot!(points, @r"
        [
            (0.0, -1.0),
            (0.0, 5.0),
            (1.0, 0.0),
        ]
        ");
    }

    #[test]
    fn approx_eq() {
        let p = Point::new(1.0, 1.0);
        assert!(p.approx_eq(&Point::new(1.05, 1.0), 0.1));
        assert!(!p.approx_eq(&Point::new(1.0, 1.2), 0.1));
    }

    #[test]
    fn projection() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(s.project(&Point::new(5.0, 2.0)), (0.5, 2.0));
        assert_eq!(s.project(&Point::new(-3.0, 4.0)), (0.0, 5.0));
        assert_eq!(s.project(&Point::new(10.0, 0.0)), (1.0, 0.0));

        let s = seg(10.0, 0.0, 0.0, 0.0);
        let (t, dist) = s.project(&Point::new(2.0, 0.0));
        assert!((t - 0.8).abs() < 1e-12);
        assert!(dist < 1e-12);
        assert_eq!(s.min_point(), Point::new(0.0, 0.0));
    }
}
