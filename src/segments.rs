use std::ops::Range;

use crate::{
    contour::{Contour, ContourIdx},
    flatten::{self, Polyline},
    geom::{Point, Segment, SegmentMeta},
    num::Lattice,
    Error,
};

/// An index into our segment arena.
///
/// Throughout this library, we assign identities to segments, so that we may
/// consider segments as different even if they have the same start- and end-points.
///
/// This index is used to identify a segment, whose data can be retrieved by looking
/// it up in [`Segments`]. (Of course, this index-as-identifier breaks down if there are
/// multiple `Segments` in flight. Just be careful not to mix them up.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SegIdx(pub usize);

impl std::fmt::Debug for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

/// How to turn contours into segments.
#[derive(Clone, Copy, Debug)]
pub struct SegmentOptions {
    /// The flattening tolerance for curves, or `None` to replace every curve by its chord.
    pub flatness: Option<f64>,
    /// The grid that every vertex is rounded to.
    pub lattice: Lattice,
}

/// What [`Segments::add_contour`] added for one subpath.
#[derive(Clone, Debug, PartialEq)]
pub struct SubpathSegments {
    /// Which subpath of the contour this was.
    pub subpath: usize,
    /// The range of segment indices that were added.
    pub segments: Range<usize>,
    /// Was the subpath closed?
    pub closed: bool,
    /// Did it contain curves?
    pub curve: bool,
}

/// What [`Segments::add_contour`] added for a whole contour.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourSegments {
    /// The contour these came from.
    pub contour: ContourIdx,
    /// The range of segment indices that were added, for all subpaths.
    pub segments: Range<usize>,
    /// The subpaths that produced at least one segment.
    pub subpaths: Vec<SubpathSegments>,
}

impl ContourSegments {
    /// A contour is closed if it has segments and all its subpaths are closed.
    pub fn closed(&self) -> bool {
        !self.subpaths.is_empty() && self.subpaths.iter().all(|s| s.closed)
    }

    /// Did any subpath contain curves?
    pub fn curve(&self) -> bool {
        self.subpaths.iter().any(|s| s.curve)
    }

    /// The number of segments added.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Were no segments added at all?
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An arena of line segments.
///
/// Segments are indexed by [`SegIdx`] and can be retrieved by indexing (i.e. with square brackets).
/// Consecutive segments of the same subpath are linked, so that we can tell
/// when two segments meet only because they're neighbors in a contour.
#[derive(Debug, Clone, Default)]
pub struct Segments {
    segs: Vec<Segment>,
    contour_prev: Vec<Option<SegIdx>>,
    contour_next: Vec<Option<SegIdx>>,
}

impl Segments {
    /// The number of line segments in this arena.
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    /// Is this arena empty?
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Iterate over all indices that can be used to index into this arena.
    pub fn indices(&self) -> impl Iterator<Item = SegIdx> {
        (0..self.segs.len()).map(SegIdx)
    }

    /// Iterate over all segments in this arena.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segs.iter()
    }

    /// Returns the index of the segment following `idx`.
    ///
    /// If `idx` is part of a non-closed polyline and it is the last segment,
    /// this returns `None`. If `idx` is part of a closed polyline, this will
    /// always return `Some`, and you might need to be careful to avoid looping
    /// infinitely.
    pub fn contour_next(&self, idx: SegIdx) -> Option<SegIdx> {
        self.contour_next[idx.0]
    }

    /// Returns the index of the segment preceding `idx`.
    ///
    /// If `idx` is part of a non-closed polyline and it is the first segment,
    /// this returns `None`. If `idx` is part of a closed polyline, this will
    /// always return `Some`.
    pub fn contour_prev(&self, idx: SegIdx) -> Option<SegIdx> {
        self.contour_prev[idx.0]
    }

    /// Are these two segments neighbors in their contour?
    pub fn are_adjacent(&self, a: SegIdx, b: SegIdx) -> bool {
        self.contour_next(a) == Some(b) || self.contour_next(b) == Some(a)
    }

    /// Add a (non-closed) polyline to this arena.
    ///
    /// The segments get a fresh contour index and default metadata.
    pub fn add_points<P: Into<Point>>(&mut self, ps: impl IntoIterator<Item = P>) {
        let meta = SegmentMeta::plain(ContourIdx(self.len()));
        let ps: Vec<Point> = ps.into_iter().map(Into::into).collect();
        self.add_polyline(&ps, false, meta);
    }

    /// Add a closed polyline to this arena.
    ///
    /// The segments get a fresh contour index and default metadata.
    pub fn add_cycle<P: Into<Point>>(&mut self, ps: impl IntoIterator<Item = P>) {
        let meta = SegmentMeta {
            closed: true,
            ..SegmentMeta::plain(ContourIdx(self.len()))
        };
        let ps: Vec<Point> = ps.into_iter().map(Into::into).collect();
        self.add_polyline(&ps, true, meta);
    }

    /// Adds a polyline, one segment per consecutive pair of distinct points.
    ///
    /// Repeated points are skipped. If `closed` is true, a closing segment
    /// from the last point back to the first one is added (unless they're
    /// the same) and the segments are linked in a cycle. Returns the range of
    /// indices that were added.
    pub fn add_polyline(&mut self, ps: &[Point], closed: bool, meta: SegmentMeta) -> Range<usize> {
        let old_len = self.segs.len();
        let mut ps = ps.to_vec();
        ps.dedup();
        if closed && ps.len() > 1 && ps.first() == ps.last() {
            ps.pop();
        }
        if ps.len() <= 1 {
            return old_len..old_len;
        }

        let closing = closed.then(|| (ps[ps.len() - 1], ps[0]));
        let pairs = ps.windows(2).map(|w| (w[0], w[1])).chain(closing);
        for (seq, (p, q)) in pairs.enumerate() {
            let idx = self.segs.len();
            self.segs.push(Segment::new(p, q, SegmentMeta { seq, ..meta.clone() }));
            self.contour_prev.push((idx > old_len).then(|| SegIdx(idx - 1)));
            self.contour_next.push(Some(SegIdx(idx + 1)));
        }

        let new_len = self.segs.len();
        if closed {
            self.contour_prev[old_len] = Some(SegIdx(new_len - 1));
            self.contour_next[new_len - 1] = Some(SegIdx(old_len));
        } else {
            self.contour_next[new_len - 1] = None;
        }
        old_len..new_len
    }

    /// Segments a contour and adds the result to this arena.
    ///
    /// The contour's transform is applied, every subpath is flattened (or
    /// replaced by chords if `options.flatness` is `None`) and every vertex is
    /// rounded to `options.lattice`. A subpath is closed if it ended with a close
    /// command or if its last vertex coincides with its first one. Subpaths that
    /// collapse to a single point don't produce any segments.
    pub fn add_contour(
        &mut self,
        contour: &Contour,
        idx: ContourIdx,
        options: &SegmentOptions,
    ) -> Result<ContourSegments, Error> {
        let path = contour.transform * contour.path.clone();
        let polylines = match options.flatness {
            Some(tol) => flatten::flatten(&path, tol)?,
            None => flatten::chords(&path)?,
        };

        let start = self.segs.len();
        let mut subpaths = Vec::new();
        for (subpath, Polyline { points, closed, curve }) in polylines.into_iter().enumerate() {
            let mut ps = points
                .into_iter()
                .map(|p| options.lattice.snap(p))
                .collect::<Result<Vec<_>, _>>()?;
            ps.dedup();
            let closed = closed || (ps.len() > 2 && ps.first() == ps.last());
            if ps.len() <= 1 {
                tracing::debug!(id = %contour.id, subpath, "dropping degenerate subpath");
                continue;
            }

            let meta = SegmentMeta {
                contour: idx,
                subpath,
                seq: 0,
                closed,
                curve,
                commands: contour.commands,
                style: contour.style.clone(),
            };
            let segments = self.add_polyline(&ps, closed, meta);
            subpaths.push(SubpathSegments {
                subpath,
                segments,
                closed,
                curve,
            });
        }

        tracing::trace!(
            id = %contour.id,
            segments = self.segs.len() - start,
            subpaths = subpaths.len(),
            "segmented contour"
        );
        Ok(ContourSegments {
            contour: idx,
            segments: start..self.segs.len(),
            subpaths,
        })
    }

    /// Moves all of `other`'s segments to the end of this arena.
    ///
    /// Returns the offset that was added to `other`'s indices.
    pub fn append(&mut self, other: Segments) -> usize {
        let offset = self.segs.len();
        let shift = |idx: Option<SegIdx>| idx.map(|SegIdx(i)| SegIdx(i + offset));
        self.segs.extend(other.segs);
        self.contour_prev
            .extend(other.contour_prev.into_iter().map(shift));
        self.contour_next
            .extend(other.contour_next.into_iter().map(shift));
        offset
    }
}

impl std::ops::Index<SegIdx> for Segments {
    type Output = Segment;

    fn index(&self, index: SegIdx) -> &Self::Output {
        &self.segs[index.0]
    }
}
