//! Classifying contours, and filtering them by class.

use crate::{
    contour::{Commands, Contour, ContourIdx},
    geom::Point,
    segments::{SegmentOptions, Segments},
    sweep::{self, SweepOptions},
    Error,
};

/// What we found out about one contour.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ContourReport {
    /// The contour's index in its table.
    pub contour: ContourIdx,
    /// The host's identifier.
    pub id: String,
    /// How its path data was written.
    pub commands: Commands,
    /// Does it contain any curves?
    pub curve: bool,
    /// Is it closed? A contour with several subpaths is closed if all of them are.
    pub closed: bool,
    /// The number of straight segments it was cut into.
    pub segments: usize,
    /// The points where the contour crosses or touches itself, in sweep order.
    pub self_intersections: Vec<Point>,
}

impl ContourReport {
    /// Does this contour cross or touch itself?
    pub fn is_self_intersecting(&self) -> bool {
        !self.self_intersections.is_empty()
    }

    /// Is this contour made only of straight lines?
    pub fn is_polyline(&self) -> bool {
        !self.curve
    }
}

/// Segments a single contour and looks for its self-intersections.
///
/// Returns the report along with the contour's segments, which the caller
/// can go on to append to a bigger arena.
pub fn scan(
    contour: &Contour,
    idx: ContourIdx,
    segment_options: &SegmentOptions,
    sweep_options: &SweepOptions,
) -> Result<(ContourReport, Segments), Error> {
    let mut segments = Segments::default();
    let added = segments.add_contour(contour, idx, segment_options)?;
    let self_intersections: Vec<Point> = sweep::intersect(&segments, sweep_options)?
        .into_iter()
        .map(|i| i.point)
        .collect();

    if !self_intersections.is_empty() {
        tracing::debug!(
            id = %contour.id,
            count = self_intersections.len(),
            "contour intersects itself"
        );
    }
    let report = ContourReport {
        contour: idx,
        id: contour.id.clone(),
        commands: contour.commands,
        curve: added.curve(),
        closed: added.closed(),
        segments: added.len(),
        self_intersections,
    };
    Ok((report, segments))
}

/// Which kinds of contours to throw out before trimming.
///
/// Every switch removes the contours of one class. They all default to off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanFilter {
    /// Remove contours written with relative commands only.
    pub remove_relative: bool,
    /// Remove contours written with absolute commands only.
    pub remove_absolute: bool,
    /// Remove contours written with both.
    pub remove_mixed: bool,
    /// Remove contours without curves.
    pub remove_polylines: bool,
    /// Remove contours with curves.
    pub remove_beziers: bool,
    /// Remove open contours.
    pub remove_opened: bool,
    /// Remove closed contours.
    pub remove_closed: bool,
    /// Remove contours that cross or touch themselves.
    pub remove_self_intersecting: bool,
}

impl ScanFilter {
    /// Should the contour described by `report` be thrown out?
    pub fn rejects(&self, report: &ContourReport) -> bool {
        let commands = match report.commands {
            Commands::Relative => self.remove_relative,
            Commands::Absolute => self.remove_absolute,
            Commands::Mixed => self.remove_mixed,
        };
        commands
            || (self.remove_polylines && report.is_polyline())
            || (self.remove_beziers && report.curve)
            || (self.remove_opened && !report.closed)
            || (self.remove_closed && report.closed)
            || (self.remove_self_intersecting && report.is_self_intersecting())
    }
}
