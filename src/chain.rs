//! Gluing pieces back together.
//!
//! Splitting cuts every segment at every intersection point, which leaves a
//! lot of pieces that were never actually intersected. Those are joined back
//! into longer chains here, so that the output doesn't get any more
//! fragmented than it has to be.

use crate::{
    contour::{ContourIdx, Style},
    geom::Point,
    split::{TrimGroup, TrimPiece},
};

/// How a [`Chain`] came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ChainKind {
    /// A run of consecutive pieces that weren't intersected.
    Merged,
    /// A single intersected piece.
    Intersected,
}

/// How far a merged run is allowed to extend.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChainScope {
    /// Runs never leave the segment they started in.
    Segment,
    /// Runs can continue into the following segments of the same subpath.
    #[default]
    Contour,
}

/// A polyline made of pieces.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Chain {
    /// The contour the pieces came from.
    pub contour: ContourIdx,
    /// The subpath the pieces came from.
    pub subpath: usize,
    /// Was that subpath closed?
    pub closed: bool,
    /// Did it contain curves?
    pub curve: bool,
    /// The style to draw this with.
    pub style: Style,
    /// Whether this is a merged run or an intersected piece.
    pub kind: ChainKind,
    /// The vertices. There are at least two, and no two consecutive ones are equal.
    pub points: Vec<Point>,
}

impl Chain {
    fn from_piece(piece: &TrimPiece, kind: ChainKind) -> Self {
        let mut points = vec![piece.start];
        if piece.end != piece.start {
            points.push(piece.end);
        }
        Chain {
            contour: piece.meta.contour,
            subpath: piece.meta.subpath,
            closed: piece.meta.closed,
            curve: piece.meta.curve,
            style: piece.meta.style.clone(),
            kind,
            points,
        }
    }

    fn continues_with(&self, piece: &TrimPiece) -> bool {
        self.contour == piece.meta.contour
            && self.subpath == piece.meta.subpath
            && self.points.last() == Some(&piece.start)
    }

    /// Does this chain end where it starts?
    pub fn is_loop(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// The total length of this chain.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Converts this chain into a path.
    pub fn to_bez_path(&self) -> kurbo::BezPath {
        let mut path = kurbo::BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(first.to_kurbo());
        }
        if self.is_loop() {
            for p in &self.points[1..self.points.len() - 1] {
                path.line_to(p.to_kurbo());
            }
            path.close_path();
        } else {
            for p in points {
                path.line_to(p.to_kurbo());
            }
        }
        path
    }
}

/// Turns trim groups into chains.
///
/// Every intersected piece becomes a chain on its own. Consecutive
/// non-intersected pieces that share an endpoint are merged into a single
/// chain, with `scope` deciding whether a run can go on from one group into
/// the next. Chains come out in the order of their first piece.
///
/// With [`ChainScope::Contour`], a closed subpath's last run is also joined
/// onto its first one when they meet at the subpath's starting vertex. The
/// joined chain takes the first run's place.
pub fn recombine(groups: &[TrimGroup], scope: ChainScope) -> Vec<Chain> {
    let mut out = Vec::new();
    let mut run: Option<Chain> = None;
    let mut merged_pieces = 0;

    let flush = |run: &mut Option<Chain>, out: &mut Vec<Chain>| {
        if let Some(chain) = run.take() {
            if chain.points.len() >= 2 {
                out.push(chain);
            }
        }
    };

    for group in groups {
        if scope == ChainScope::Segment {
            flush(&mut run, &mut out);
        }
        for piece in &group.pieces {
            if piece.intersected {
                flush(&mut run, &mut out);
                flush(
                    &mut Some(Chain::from_piece(piece, ChainKind::Intersected)),
                    &mut out,
                );
                continue;
            }
            merged_pieces += 1;
            if let Some(chain) = run.as_mut().filter(|c| c.continues_with(piece)) {
                if chain.points.last() != Some(&piece.end) {
                    chain.points.push(piece.end);
                }
                continue;
            }
            flush(&mut run, &mut out);
            run = Some(Chain::from_piece(piece, ChainKind::Merged));
        }
    }
    flush(&mut run, &mut out);
    if scope == ChainScope::Contour {
        out = join_around(out);
    }

    tracing::debug!(
        combinable = merged_pieces,
        chains = out.len(),
        "recombined pieces"
    );
    out
}

fn join_around(chains: Vec<Chain>) -> Vec<Chain> {
    let mut ret = Vec::with_capacity(chains.len());
    let mut chains = chains.into_iter().peekable();
    while let Some(first) = chains.next() {
        let mut subpath = vec![first];
        while let Some(c) = chains
            .next_if(|c| c.contour == subpath[0].contour && c.subpath == subpath[0].subpath)
        {
            subpath.push(c);
        }

        let wraps = subpath.len() >= 2
            && subpath[0].closed
            && subpath[0].kind == ChainKind::Merged
            && subpath.last().is_some_and(|last| {
                last.kind == ChainKind::Merged && last.points.last() == subpath[0].points.first()
            });
        if wraps {
            if let Some(mut last) = subpath.pop() {
                last.points.extend_from_slice(&subpath[0].points[1..]);
                subpath[0] = last;
            }
        }
        ret.extend(subpath);
    }
    ret
}
