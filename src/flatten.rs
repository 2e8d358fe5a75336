//! Turning paths into polylines.

use kurbo::{BezPath, PathEl};

use crate::{geom::Point, Error};

/// One subpath, approximated by straight lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// The vertices, starting with the subpath's move-to point.
    ///
    /// If the subpath was explicitly closed, the closing line is implied: the
    /// first point is *not* repeated at the end.
    pub points: Vec<Point>,
    /// Did the subpath end with an explicit close command?
    pub closed: bool,
    /// Did the subpath contain any curve commands?
    pub curve: bool,
}

impl Polyline {
    fn starting_at(p: Point) -> Self {
        Polyline {
            points: vec![p],
            closed: false,
            curve: false,
        }
    }
}

/// Approximates every subpath of `path` by a polyline.
///
/// Curves are subdivided until no point on them is further than `tolerance`
/// from the polyline. Straight lines are kept as they are, so every vertex of
/// the input path (except curve control points) is a vertex of the output.
pub fn flatten(path: &BezPath, tolerance: f64) -> Result<Vec<Polyline>, Error> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(Error::InvalidConfig {
            field: "flatness",
            reason: format!("must be positive, got {tolerance}"),
        });
    }
    walk(path, Some(tolerance))
}

/// Splits `path` into subpaths without flattening, replacing every curve by its chord.
pub fn chords(path: &BezPath) -> Result<Vec<Polyline>, Error> {
    walk(path, None)
}

fn walk(path: &BezPath, tolerance: Option<f64>) -> Result<Vec<Polyline>, Error> {
    let mut ret = Vec::new();
    let mut current: Option<Polyline> = None;
    // Where the next subpath starts if a drawing command comes without a move-to.
    let mut pen = Point::new(0.0, 0.0);

    for el in path.elements() {
        let check = |p: kurbo::Point| {
            if p.is_finite() {
                Ok(Point::from(p))
            } else {
                Err(Error::NonFinite)
            }
        };
        match *el {
            PathEl::MoveTo(p) => {
                let p = check(p)?;
                ret.extend(current.take());
                current = Some(Polyline::starting_at(p));
                pen = p;
            }
            PathEl::LineTo(p) => {
                let p = check(p)?;
                current
                    .get_or_insert_with(|| Polyline::starting_at(pen))
                    .points
                    .push(p);
            }
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {
                let end = check(el.end_point().unwrap_or_default())?;
                let poly = current.get_or_insert_with(|| Polyline::starting_at(pen));
                poly.curve = true;
                let from = poly.points.last().copied().unwrap_or(pen).to_kurbo();
                match tolerance {
                    Some(tol) => flatten_curve(from, *el, tol, &mut poly.points)?,
                    None => poly.points.push(end),
                }
                // Flattening is allowed to wobble a little at the end, but
                // consecutive curves must still meet exactly.
                if let Some(last) = poly.points.last_mut() {
                    *last = end;
                }
            }
            PathEl::ClosePath => {
                if let Some(mut poly) = current.take() {
                    poly.closed = true;
                    pen = poly.points[0];
                    ret.push(poly);
                }
            }
        }
    }
    ret.extend(current);
    Ok(ret)
}

fn flatten_curve(
    from: kurbo::Point,
    el: PathEl,
    tolerance: f64,
    out: &mut Vec<Point>,
) -> Result<(), Error> {
    let n = out.len();
    kurbo::flatten([PathEl::MoveTo(from), el], tolerance, |el| {
        if let PathEl::LineTo(p) = el {
            out.push(p.into());
        }
    });
    // Even the most degenerate curve gets a chord.
    if out.len() == n {
        out.push(el.end_point().unwrap_or(from).into());
    }
    if out[n..].iter().all(Point::is_finite) {
        Ok(())
    } else {
        Err(Error::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use kurbo::{CubicBez, ParamCurve, ParamCurveNearest};

    #[test]
    fn lines_are_untouched() {
        let path = BezPath::from_svg("M0 0 L10 0 L10 10 Z M20 20 L30 30").unwrap();
        let polys = flatten(&path, 0.1).unwrap();
        insta::assert_debug_snapshot!(polys, @r"
        [
            Polyline {
                points: [
                    (0.0, 0.0),
                    (10.0, 0.0),
                    (10.0, 10.0),
                ],
                closed: true,
                curve: false,
            },
            Polyline {
                points: [
                    (20.0, 20.0),
                    (30.0, 30.0),
                ],
                closed: false,
                curve: false,
            },
        ]
        ");
    }

    #[test]
    fn drawing_after_close_restarts_at_the_subpath_start() {
        let path = BezPath::from_svg("M1 1 L5 1 Z L1 5").unwrap();
        let polys = chords(&path).unwrap();
        assert_eq!(polys.len(), 2);
        assert_eq!(
            polys[1].points,
            vec![Point::new(1.0, 1.0), Point::new(1.0, 5.0)]
        );
    }

    #[test]
    fn cubic_within_tolerance() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        let mut path = BezPath::new();
        path.move_to(c.p0);
        path.curve_to(c.p1, c.p2, c.p3);

        for tol in [1.0, 0.1, 0.01] {
            let polys = flatten(&path, tol).unwrap();
            assert_eq!(polys.len(), 1);
            let poly = &polys[0];
            assert!(poly.curve);
            assert!(poly.points.len() > 2);
            assert_eq!(poly.points[0], Point::new(0.0, 0.0));
            assert_eq!(*poly.points.last().unwrap(), Point::new(100.0, 0.0));

            // Every chord midpoint is close to the curve.
            for w in poly.points.windows(2) {
                let mid = w[0].affine(&w[1], 0.5).to_kurbo();
                let nearest = c.nearest(mid, 1e-9);
                assert!(nearest.distance_sq.sqrt() <= tol * 1.1);
            }
            // And so are the vertices.
            for p in &poly.points {
                let nearest = c.nearest(p.to_kurbo(), 1e-9);
                assert!(c.eval(nearest.t).distance(p.to_kurbo()) <= tol);
            }
        }
    }

    #[test]
    fn degenerate_curve() {
        let mut path = BezPath::new();
        path.move_to((3.0, 3.0));
        path.quad_to((3.0, 3.0), (3.0, 3.0));
        let polys = flatten(&path, 0.1).unwrap();
        assert!(polys[0].points.len() >= 2);
        assert!(polys[0].points.iter().all(|p| *p == Point::new(3.0, 3.0)));
        assert!(polys[0].curve);
    }

    #[test]
    fn chords_skip_flattening() {
        let path = BezPath::from_svg("M0 0 C0 10 10 10 10 0").unwrap();
        let polys = chords(&path).unwrap();
        assert_eq!(
            polys[0].points,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
        assert!(polys[0].curve);
    }

    #[test]
    fn bad_input() {
        let path = BezPath::from_svg("M0 0 L1 1").unwrap();
        assert_matches!(
            flatten(&path, 0.0),
            Err(Error::InvalidConfig {
                field: "flatness",
                ..
            })
        );
        assert_matches!(flatten(&path, f64::NAN), Err(Error::InvalidConfig { .. }));

        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((f64::INFINITY, 0.0));
        assert_matches!(flatten(&path, 0.1), Err(Error::NonFinite));
    }
}
