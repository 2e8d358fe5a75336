//! Utilities for generating examples, benchmarks, and test cases.

use kurbo::{BezPath, Circle, Shape};

use crate::{Contour, Point};

fn polygon(id: String, points: &[Point]) -> Contour {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(first.to_kurbo());
        for p in rest {
            path.line_to(p.to_kurbo());
        }
        path.close_path();
    }
    Contour::new(id, path)
}

/// Generate a bunch of squares, arranged in a grid.
///
/// The top-left of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated down by `slant`.
fn squares(
    prefix: &str,
    (x0, y0): (f64, f64),
    size: f64,
    offset: f64,
    slant: f64,
    count: usize,
) -> Vec<Contour> {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            ret.push(polygon(
                format!("{prefix}{i}_{j}"),
                &[
                    Point::new(x, y),
                    Point::new(x, y + size),
                    Point::new(x + size, y + size + slant),
                    Point::new(x + size, y + slant),
                ],
            ));
        }
    }
    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// The outer `n x n` squares come first, followed by the inner
/// `(n - 1) x (n - 1)` ones. Every inner square crosses four outer ones,
/// twice each.
pub fn checkerboard(n: usize) -> Vec<Contour> {
    let mut ret = squares("outer", (0.0, 0.0), 30.0, 40.0, 0.0, n);
    ret.extend(squares("inner", (20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)));
    ret
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
///
/// Horizontal lines have special handling in the sweep-line algorithm, so
/// their presence or absence can affect performance.
pub fn slanted_checkerboard(n: usize) -> Vec<Contour> {
    let mut ret = squares("outer", (0.0, 0.0), 30.0, 40.0, 1.0, n);
    ret.extend(squares("inner", (20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)));
    ret
}

/// A row of `n` overlapping circles, each one crossing its neighbors.
///
/// Unlike the other generators, these have curves that need flattening.
pub fn circles(n: usize) -> Vec<Contour> {
    (0..n)
        .map(|i| {
            let circle = Circle::new((15.0 * i as f64, 0.0), 10.0);
            Contour::new(format!("circle{i}"), circle.to_path(1e-3))
        })
        .collect()
}
