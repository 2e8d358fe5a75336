//! Configuration for the whole trimming pipeline.

use crate::{
    chain::ChainScope,
    contour::Style,
    geom::SegmentMeta,
    num::Lattice,
    scan::ScanFilter,
    segments::SegmentOptions,
    sweep::SweepOptions,
    Error,
};

/// Which segments get cut.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrimScope {
    /// Only segments from open subpaths.
    Open,
    /// Only segments from closed subpaths.
    Closed,
    /// Everything.
    #[default]
    Both,
}

impl TrimScope {
    /// Does this scope cover a segment with this metadata?
    pub fn includes(&self, meta: &SegmentMeta) -> bool {
        match self {
            TrimScope::Open => !meta.closed,
            TrimScope::Closed => meta.closed,
            TrimScope::Both => true,
        }
    }
}

/// The style that output chains are drawn with.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePolicy {
    /// Keep the style of the contour each chain came from.
    #[default]
    Original,
    /// Give every chain this style.
    Trimmed(String),
}

impl StylePolicy {
    /// The usual style for trimmed output: a thin black stroke without a fill.
    pub const DEFAULT_TRIMMED: &'static str = "fill:none;stroke:#000000;stroke-width:1px";

    /// A [`StylePolicy::Trimmed`] with the usual style.
    pub fn trimmed() -> Self {
        StylePolicy::Trimmed(Self::DEFAULT_TRIMMED.to_owned())
    }

    /// The style to use for a chain whose contour had style `original`.
    pub fn apply(&self, original: &Style) -> Style {
        match self {
            StylePolicy::Original => original.clone(),
            StylePolicy::Trimmed(s) => Style::new(s.as_str()),
        }
    }
}

/// Options for [`Trimmer`](crate::Trimmer).
///
/// These can be (de)serialized; missing fields get their default values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrimOptions {
    /// The maximum distance between a curve and its flattened polyline.
    pub flatness: f64,
    /// Coordinates are rounded to this many decimal places.
    pub decimals: u32,
    /// Intersection points closer than this to a segment cut it, and pieces
    /// closer than this to one another are merged.
    pub snap_tolerance: f64,
    /// If false, curves are replaced by straight lines between their endpoints
    /// instead of being flattened.
    pub flatten_curves: bool,
    /// Remove pieces that coincide with other pieces.
    pub remove_duplicates: bool,
    /// When removing duplicates, keep the last copy instead of the first one.
    pub reverse_removal_order: bool,
    /// Join runs of pieces that weren't intersected back into longer chains.
    pub combine_nonintersects: bool,
    /// See [`SweepOptions::ignore_adjacent`].
    pub ignore_adjacent: bool,
    /// Which segments to cut.
    pub scope: TrimScope,
    /// How far joined runs can reach.
    pub chain_scope: ChainScope,
    /// How to style the output chains.
    pub style: StylePolicy,
    /// Contours to leave out entirely.
    pub filter: ScanFilter,
    /// See [`SweepOptions::max_events`].
    pub max_events: Option<usize>,
}

impl Default for TrimOptions {
    fn default() -> Self {
        TrimOptions {
            flatness: 0.1,
            decimals: 3,
            snap_tolerance: 0.1,
            flatten_curves: true,
            remove_duplicates: true,
            reverse_removal_order: false,
            combine_nonintersects: true,
            ignore_adjacent: true,
            scope: TrimScope::Both,
            chain_scope: ChainScope::Contour,
            style: StylePolicy::Original,
            filter: ScanFilter::default(),
            max_events: None,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

impl TrimOptions {
    /// Checks that all the options make sense.
    pub fn validate(&self) -> Result<(), Error> {
        positive("flatness", self.flatness)?;
        positive("snap_tolerance", self.snap_tolerance)?;
        self.lattice()?;
        Ok(())
    }

    /// The lattice that coordinates get rounded to.
    pub fn lattice(&self) -> Result<Lattice, Error> {
        Lattice::new(self.decimals)
    }

    /// The options for segmenting contours.
    pub fn segment_options(&self) -> Result<SegmentOptions, Error> {
        Ok(SegmentOptions {
            flatness: self.flatten_curves.then_some(self.flatness),
            lattice: self.lattice()?,
        })
    }

    /// The options for finding intersections.
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            decimals: self.decimals,
            ignore_adjacent: self.ignore_adjacent,
            max_events: self.max_events,
        }
    }
}
