//! The whole pipeline, from contours to chains.

use crate::{
    chain::{self, Chain},
    contour::{Contour, ContourInfo, ContourTable},
    dedup,
    options::TrimOptions,
    scan::{self, ContourReport},
    segments::Segments,
    split::{self, TrimGroup},
    sweep::{self, IntersectionPoint},
    Error,
};

/// Everything that came out of a [`Trimmer::run`].
#[derive(Clone, Debug)]
pub struct TrimOutput {
    /// The contours that took part. Filtered contours have been removed, but
    /// their indices stay reserved.
    pub table: ContourTable,
    /// The segments of all the contours that took part.
    pub segments: Segments,
    /// The intersections between all those segments.
    pub intersections: Vec<IntersectionPoint>,
    /// The pieces that the segments were cut into, one group per segment in scope.
    pub groups: Vec<TrimGroup>,
    /// The pieces, glued back together as far as possible. Empty unless
    /// [`TrimOptions::combine_nonintersects`] was set.
    pub chains: Vec<Chain>,
    /// One report per input contour, in input order, filtered or not.
    pub reports: Vec<ContourReport>,
}

/// Finds the intersections in a bunch of contours, and cuts them up there.
#[derive(Clone, Debug, Default)]
pub struct Trimmer {
    options: TrimOptions,
}

impl Trimmer {
    /// Creates a trimmer, failing if the options don't make sense.
    pub fn new(options: TrimOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Trimmer { options })
    }

    /// The options we were created with.
    pub fn options(&self) -> &TrimOptions {
        &self.options
    }

    /// Runs the whole pipeline.
    ///
    /// Contours are segmented and scanned one by one; the ones rejected by
    /// [`TrimOptions::filter`] are removed from the table and take no further
    /// part. The rest get intersected with one another, cut and optionally
    /// deduplicated and recombined.
    pub fn run<'a>(
        &self,
        contours: impl IntoIterator<Item = &'a Contour>,
    ) -> Result<TrimOutput, Error> {
        let opts = &self.options;
        let segment_options = opts.segment_options()?;
        let sweep_options = opts.sweep_options();

        let mut table = ContourTable::default();
        let mut segments = Segments::default();
        let mut reports = Vec::new();
        for contour in contours {
            let idx = table.insert(ContourInfo::from(contour));
            let (report, contour_segments) =
                scan::scan(contour, idx, &segment_options, &sweep_options)?;
            if opts.filter.rejects(&report) {
                tracing::debug!(id = %contour.id, "filtered out");
                table.remove(idx);
            } else {
                segments.append(contour_segments);
            }
            reports.push(report);
        }
        tracing::debug!(
            contours = table.len(),
            segments = segments.len(),
            "segmented contours"
        );

        let intersections = sweep::intersect(&segments, &sweep_options)?;
        tracing::debug!(points = intersections.len(), "found intersections");

        let mut groups =
            split::split_all(&segments, &intersections, opts.snap_tolerance, opts.scope)?;
        if opts.remove_duplicates {
            groups = dedup::dedup(groups, opts.reverse_removal_order, &segment_options.lattice);
        }

        let chains = if opts.combine_nonintersects {
            let mut chains = chain::recombine(&groups, opts.chain_scope);
            for c in &mut chains {
                c.style = opts.style.apply(&c.style);
            }
            chains
        } else {
            Vec::new()
        };

        Ok(TrimOutput {
            table,
            segments,
            intersections,
            groups,
            chains,
            reports,
        })
    }
}
