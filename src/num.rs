//! Numerical helpers: a cheap ordered float, and the fixed-point lattice that
//! all sweep-line predicates are evaluated on.

use std::hash::Hash;

use crate::{geom::Point, Error};

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one just treats incomparable values (i.e. NaNs) as equal -- it doesn't
/// order them, nor does it guard against them on construction. We reject
/// non-finite input before any of it gets wrapped.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl CheapOrderedFloat {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

// Now comes the fishy stuff.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

/// A point on the [`Lattice`], in lattice units.
///
/// Sorted by `x` and then by `y`, just like [`Point`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPoint {
    /// Horizontal coordinate, in multiples of the lattice spacing.
    pub x: i64,
    /// Vertical coordinate, in multiples of the lattice spacing.
    pub y: i64,
}

impl std::fmt::Debug for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl GridPoint {
    /// Converts to floating point, still in lattice units.
    ///
    /// This is exact, because lattice coordinates are bounded by [`Lattice::MAX_GRID`].
    pub fn to_f64(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// The sign of the turn `a -> b -> c`, computed exactly.
///
/// Positive means counter-clockwise (`c` is to the left of the directed line
/// `a -> b`, assuming `y` points up), negative means clockwise and zero means
/// the three points are collinear.
pub fn orient(a: GridPoint, b: GridPoint, c: GridPoint) -> i128 {
    let abx = b.x as i128 - a.x as i128;
    let aby = b.y as i128 - a.y as i128;
    let acx = c.x as i128 - a.x as i128;
    let acy = c.y as i128 - a.y as i128;
    abx * acy - aby * acx
}

/// A fixed-point grid with spacing `10^-decimals`.
///
/// Every coordinate that enters the sweep-line is rounded onto this grid
/// first. On the grid, coordinates are integers and so orientation tests
/// can be done exactly (see [`orient`]), which is what keeps the sweep from
/// tripping over near-parallel segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    decimals: u32,
    scale: f64,
}

impl Lattice {
    /// The largest supported number of decimal places.
    pub const MAX_DECIMALS: u32 = 12;

    /// The largest absolute lattice coordinate.
    ///
    /// With this bound, differences of lattice coordinates are exact in `f64`
    /// and products of differences fit comfortably in an `i128`.
    pub const MAX_GRID: i64 = 1 << 40;

    /// Creates a lattice with spacing `10^-decimals`.
    pub fn new(decimals: u32) -> Result<Self, Error> {
        if decimals > Self::MAX_DECIMALS {
            return Err(Error::InvalidConfig {
                field: "decimals",
                reason: format!("must be at most {}, got {decimals}", Self::MAX_DECIMALS),
            });
        }
        Ok(Lattice {
            decimals,
            scale: 10f64.powi(decimals as i32),
        })
    }

    /// The number of decimal places we round to.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// The distance between adjacent lattice points, in user units.
    pub fn spacing(&self) -> f64 {
        1.0 / self.scale
    }

    /// Rounds a coordinate to the nearest lattice coordinate, staying in user units.
    pub fn round(&self, x: f64) -> f64 {
        (x * self.scale).round() / self.scale
    }

    /// Rounds both coordinates of a point.
    pub fn round_point(&self, p: Point) -> Point {
        Point::new(self.round(p.x), self.round(p.y))
    }

    fn coord_to_grid(&self, x: f64) -> Result<i64, Error> {
        if !x.is_finite() {
            return Err(Error::NonFinite);
        }
        let g = (x * self.scale).round();
        if g.abs() > Self::MAX_GRID as f64 {
            return Err(Error::PrecisionOverflow {
                decimals: self.decimals,
            });
        }
        Ok(g as i64)
    }

    /// Converts a point in user units to the nearest lattice point.
    pub fn to_grid(&self, p: Point) -> Result<GridPoint, Error> {
        Ok(GridPoint {
            x: self.coord_to_grid(p.x)?,
            y: self.coord_to_grid(p.y)?,
        })
    }

    /// Rounds a point to the lattice, failing if it can't be represented there.
    pub fn snap(&self, p: Point) -> Result<Point, Error> {
        let g = self.to_grid(p)?;
        Ok(Point::new(g.x as f64 / self.scale, g.y as f64 / self.scale))
    }

    /// Converts a point in (possibly fractional) lattice units back to user units.
    pub fn from_grid(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    // Kind of like Arbitrary, but
    // - it's a local trait, so we can impl it for whatever we want, and
    // - it only returns "reasonable" values.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl<S: Reasonable, T: Reasonable> Reasonable for (S, T) {
        type Strategy = (S::Strategy, T::Strategy);

        fn reasonable() -> Self::Strategy {
            (S::reasonable(), T::reasonable())
        }
    }

    impl Reasonable for f64 {
        type Strategy = BoxedStrategy<f64>;

        fn reasonable() -> Self::Strategy {
            (-1e4..1e4).boxed()
        }
    }

    #[test]
    fn cheap_ordering() {
        let mut xs: Vec<CheapOrderedFloat> = [3.0, -1.0, 2.5, 0.0]
            .into_iter()
            .map(CheapOrderedFloat::from)
            .collect();
        xs.sort();
        let xs: Vec<f64> = xs.into_iter().map(CheapOrderedFloat::into_inner).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 2.5, 3.0]);
    }

    #[test]
    fn rounding() {
        let lattice = Lattice::new(3).unwrap();
        assert_eq!(lattice.round(1.23449), 1.234);
        assert_eq!(lattice.round(-0.0004), 0.0);
        assert_eq!(
            lattice.to_grid(Point::new(5.0, -5.0)).unwrap(),
            GridPoint { x: 5000, y: -5000 }
        );
        assert_eq!(
            lattice.from_grid(Point::new(5000.0, 2500.0)),
            Point::new(5.0, 2.5)
        );
    }

    #[test]
    fn bad_lattices() {
        assert_matches!(
            Lattice::new(13),
            Err(Error::InvalidConfig {
                field: "decimals",
                ..
            })
        );
        let lattice = Lattice::new(9).unwrap();
        assert_matches!(
            lattice.to_grid(Point::new(1e6, 0.0)),
            Err(Error::PrecisionOverflow { decimals: 9 })
        );
        assert_matches!(
            lattice.to_grid(Point { x: f64::NAN, y: 0.0 }),
            Err(Error::NonFinite)
        );
    }

    #[test]
    fn exact_orientation() {
        let g = |x, y| GridPoint { x, y };
        assert!(orient(g(0, 0), g(10, 0), g(5, 1)) > 0);
        assert!(orient(g(0, 0), g(10, 0), g(5, -1)) < 0);
        assert_eq!(orient(g(0, 0), g(10, 0), g(20, 0)), 0);

        // Nearly parallel, with coordinates big enough that f64 would lose the sign.
        let big = Lattice::MAX_GRID;
        assert_eq!(orient(g(-big, -big), g(big, big), g(big - 1, big - 1)), 0);
        assert!(orient(g(-big, -big), g(big, big), g(big - 1, big)) > 0);
    }

    proptest! {
        #[test]
        fn round_is_idempotent(x in f64::reasonable()) {
            let lattice = Lattice::new(3).unwrap();
            let once = lattice.round(x);
            prop_assert_eq!(lattice.round(once), once);
        }
    }
}
