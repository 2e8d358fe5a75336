#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod chain;
pub mod contour;
pub mod dedup;
pub mod flatten;
mod geom;
mod num;
pub mod options;
pub mod scan;
mod segments;
pub mod split;
pub mod sweep;
pub mod trim;

#[cfg(feature = "debug-svg")]
pub mod svg;

#[cfg(feature = "generators")]
pub mod generators;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod treevec;

pub use contour::{Commands, Contour, ContourIdx, ContourTable, Style};
pub use geom::{Point, Segment, SegmentMeta};
pub use num::Lattice;
pub use options::TrimOptions;
pub use segments::{ContourSegments, SegIdx, SegmentOptions, Segments, SubpathSegments};
pub use sweep::{intersect, IntersectionPoint, SweepOptions};
pub use trim::{TrimOutput, Trimmer};

/// Everything that can go wrong.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An option had a value we can't work with.
    ///
    /// We never silently clamp options, so this is returned instead.
    InvalidConfig {
        /// The name of the offending option.
        field: &'static str,
        /// What's wrong with it.
        reason: String,
    },
    /// At least one of the input coordinates was infinite or NaN.
    NonFinite,
    /// Some SVG path data couldn't be parsed.
    PathData {
        /// The id of the contour the path data was for.
        id: String,
        /// The parser's complaint.
        reason: String,
    },
    /// The sweep-line algorithm got confused.
    ///
    /// This happens with nasty, nearly-degenerate input. Rounding to fewer
    /// decimals, or flattening curves more coarsely, usually helps.
    SweepInconsistency {
        /// Roughly where it happened.
        point: Point,
    },
    /// The sweep-line algorithm processed more events than it was allowed to.
    EventBudgetExceeded {
        /// The number of events that was allowed.
        budget: usize,
    },
    /// The input coordinates were too big to round to the requested number of decimals.
    PrecisionOverflow {
        /// The requested number of decimals.
        decimals: u32,
    },
}

impl Error {
    /// Can this be fixed by trying again with different options?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::SweepInconsistency { .. }
                | Error::EventBudgetExceeded { .. }
                | Error::PrecisionOverflow { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidConfig { field, reason } => write!(f, "invalid option '{field}': {reason}"),
            Error::NonFinite => write!(f, "one of the inputs was infinite or NaN"),
            Error::PathData { id, reason } => write!(f, "bad path data for '{id}': {reason}"),
            Error::SweepInconsistency { point } => write!(
                f,
                "intersection detection failed near {point:?}; try adjusting 'decimals' \
                 (rounding precision) and 'flatness' (flattening tolerance)"
            ),
            Error::EventBudgetExceeded { budget } => {
                write!(f, "intersection detection gave up after {budget} events")
            }
            Error::PrecisionOverflow { decimals } => write!(
                f,
                "coordinates are too large to round to {decimals} decimals; try fewer 'decimals'"
            ),
        }
    }
}

impl std::error::Error for Error {}
