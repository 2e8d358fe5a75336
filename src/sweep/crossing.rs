//! Exact predicates on lattice segments.

use std::cmp::Ordering;

use crate::{
    geom::Point,
    num::{orient, GridPoint},
};

/// A segment on the lattice, with its endpoints in sweep order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridSeg {
    pub left: GridPoint,
    pub right: GridPoint,
}

impl GridSeg {
    /// Returns `None` if the two endpoints coincide.
    pub fn new(a: GridPoint, b: GridPoint) -> Option<Self> {
        match a.cmp(&b) {
            Ordering::Less => Some(GridSeg { left: a, right: b }),
            Ordering::Greater => Some(GridSeg { left: b, right: a }),
            Ordering::Equal => None,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.left.x == self.right.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.left.y == self.right.y
    }

    /// Compares slopes, with vertical segments being steeper than everything else.
    ///
    /// This is the order in which segments leave a common point, from bottom to top.
    pub fn cmp_slope(&self, other: &GridSeg) -> Ordering {
        match (self.is_vertical(), other.is_vertical()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let (dx0, dy0) = self.delta();
                let (dx1, dy1) = other.delta();
                // Both dx's are positive, so we can cross-multiply.
                (dy0 * dx1).cmp(&(dy1 * dx0))
            }
        }
    }

    fn delta(&self) -> (i128, i128) {
        (
            self.right.x as i128 - self.left.x as i128,
            self.right.y as i128 - self.left.y as i128,
        )
    }

    /// The signed distance from this segment's line to `p`, in lattice units.
    ///
    /// Positive values mean that `p` is above the segment (or to the left of a
    /// vertical segment).
    pub fn signed_distance(&self, p: Point) -> f64 {
        let l = self.left.to_f64();
        let r = self.right.to_f64();
        let dx = r.x - l.x;
        let dy = r.y - l.y;
        (dx * (p.y - l.y) - dy * (p.x - l.x)) / dx.hypot(dy)
    }
}

/// If the two segments cross at a point interior to both, returns that point
/// (in lattice units).
///
/// Touching and collinear segments don't count: those always meet at an
/// endpoint of one of them. The point is computed from the segments in a
/// canonical order, so swapping the arguments gives bit-identical results.
pub(crate) fn crossing_point(a: &GridSeg, b: &GridSeg) -> Option<Point> {
    let (a, b) = if (a.left, a.right) <= (b.left, b.right) {
        (a, b)
    } else {
        (b, a)
    };

    let strictly_opposite = |o0: i128, o1: i128| (o0 > 0 && o1 < 0) || (o0 < 0 && o1 > 0);
    let o0 = orient(b.left, b.right, a.left);
    let o1 = orient(b.left, b.right, a.right);
    if !strictly_opposite(o0, o1) {
        return None;
    }
    if !strictly_opposite(orient(a.left, a.right, b.left), orient(a.left, a.right, b.right)) {
        return None;
    }

    let t = o0 as f64 / (o0 - o1) as f64;
    let l = a.left.to_f64();
    let r = a.right.to_f64();
    let mut x = l.x + (r.x - l.x) * t;
    let mut y = l.y + (r.y - l.y) * t;

    // Axis-aligned segments know one coordinate exactly.
    if a.is_vertical() {
        x = l.x;
    } else if b.is_vertical() {
        x = b.left.x as f64;
    }
    if a.is_horizontal() {
        y = l.y;
    } else if b.is_horizontal() {
        y = b.left.y as f64;
    }

    // Rounding must not push the point out of either segment's bounding box.
    let x_lo = a.left.x.max(b.left.x) as f64;
    let x_hi = a.right.x.min(b.right.x) as f64;
    let y_lo = a.left.y.min(a.right.y).max(b.left.y.min(b.right.y)) as f64;
    let y_hi = a.left.y.max(a.right.y).min(b.left.y.max(b.right.y)) as f64;
    Some(Point::new(x.clamp(x_lo, x_hi), y.clamp(y_lo, y_hi)))
}
