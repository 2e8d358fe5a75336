//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;
use kurbo::{BezPath, Point};

use crate::contour::Contour;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a coordinate, with a good chance of it being exactly one we've seen before.
///
/// Exactly repeated coordinates are what make for horizontal and vertical
/// segments, and for touching and overlapping contours.
fn coordinate(seen: &[f64], u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    let reuse: bool = u.arbitrary()?;
    if reuse && !seen.is_empty() {
        Ok(*u.choose(seen)?)
    } else {
        float_in_range(-100.0, 100.0, u)
    }
}

fn point(seen: &mut Vec<f64>, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    let x = coordinate(seen, u)?;
    let y = coordinate(seen, u)?;
    seen.extend([x, y]);
    Ok(Point::new(x, y))
}

/// Generate an arbitrary path of lines and curves, possibly with several subpaths.
pub fn path(u: &mut Unstructured<'_>) -> Result<BezPath, arbitrary::Error> {
    let mut seen = Vec::new();
    let mut path = BezPath::new();
    let subpaths = u.int_in_range(1..=2)?;
    for _ in 0..subpaths {
        path.move_to(point(&mut seen, u)?);
        let elements = u.int_in_range(1..=5)?;
        for _ in 0..elements {
            match u.int_in_range(0..=3)? {
                0 | 1 => path.line_to(point(&mut seen, u)?),
                2 => path.quad_to(point(&mut seen, u)?, point(&mut seen, u)?),
                _ => path.curve_to(
                    point(&mut seen, u)?,
                    point(&mut seen, u)?,
                    point(&mut seen, u)?,
                ),
            }
        }
        if u.arbitrary()? {
            path.close_path();
        }
    }
    Ok(path)
}

/// Generate a handful of arbitrary contours, with distinct ids.
pub fn contours(u: &mut Unstructured<'_>) -> Result<Vec<Contour>, arbitrary::Error> {
    let count = u.int_in_range(1..=4)?;
    (0..count)
        .map(|i| Ok(Contour::new(format!("path{i}"), path(u)?)))
        .collect()
}
