//! The Bentley-Ottmann sweep itself.

use std::cmp::Ordering;

use crate::{
    geom::Point,
    num::{GridPoint, Lattice},
    segments::{SegIdx, Segments},
    treevec::TreeVec,
    Error,
};

use super::{
    crossing::{crossing_point, GridSeg},
    event_queue::{Event, EventQueue},
    IntersectionPoint, SweepOptions,
};

/// The state of one sweep over a segment arena.
///
/// The sweep-line is vertical and moves to the right; events at the same `x`
/// are handled from bottom to top. Everything in here is in lattice units.
pub(crate) struct Sweeper<'a> {
    segments: &'a Segments,
    lattice: Lattice,
    ignore_adjacent: bool,
    max_events: Option<usize>,
    /// The lattice version of each segment, or `None` if it collapsed to a point.
    grid: Vec<Option<GridSeg>>,
    /// The lattice endpoints of each segment in drawing order.
    drawn: Vec<(GridPoint, GridPoint)>,
    queue: EventQueue,
    /// The segments currently crossing the sweep-line, from bottom to top.
    status: TreeVec<SegIdx, 32>,
    eps: f64,
    processed: usize,
    out: Vec<IntersectionPoint>,
}

impl<'a> Sweeper<'a> {
    pub fn new(segments: &'a Segments, opts: &SweepOptions) -> Result<Self, Error> {
        let lattice = Lattice::new(opts.decimals)?;
        let mut grid = Vec::with_capacity(segments.len());
        let mut drawn = Vec::with_capacity(segments.len());
        let mut queue = EventQueue::default();
        let mut max_coord = 0i64;

        for idx in segments.indices() {
            let seg = &segments[idx];
            let start = lattice.to_grid(seg.start)?;
            let end = lattice.to_grid(seg.end)?;
            max_coord = max_coord
                .max(start.x.abs())
                .max(start.y.abs())
                .max(end.x.abs())
                .max(end.y.abs());

            let g = GridSeg::new(start, end);
            match &g {
                Some(g) => {
                    queue.push_start(g.left.to_f64(), idx);
                    queue.push_end(g.right.to_f64(), idx);
                }
                None => tracing::trace!(?idx, "segment collapsed on the lattice"),
            }
            grid.push(g);
            drawn.push((start, end));
        }

        // Crossing points are computed in floating point, so we need some slack
        // when matching them up with segments. Lattice coordinates are integers,
        // so this is much smaller than the distance between lattice points.
        let eps = (max_coord as f64 * (f64::EPSILON * 64.0)).max(1e-6);

        Ok(Sweeper {
            segments,
            lattice,
            ignore_adjacent: opts.ignore_adjacent,
            max_events: opts.max_events,
            grid,
            drawn,
            queue,
            status: TreeVec::default(),
            eps,
            processed: 0,
            out: Vec::new(),
        })
    }

    pub fn run(mut self) -> Result<Vec<IntersectionPoint>, Error> {
        while let Some((p, event)) = self.queue.pop() {
            self.processed += 1;
            if let Some(budget) = self.max_events {
                if self.processed > budget {
                    return Err(Error::EventBudgetExceeded { budget });
                }
            }
            self.step(p, event)?;

            #[cfg(feature = "slow-asserts")]
            self.check_invariants(p);
        }
        tracing::debug!(
            events = self.processed,
            intersections = self.out.len(),
            "sweep finished"
        );
        Ok(self.out)
    }

    fn seg(&self, idx: SegIdx) -> &GridSeg {
        self.grid[idx.0]
            .as_ref()
            .expect("collapsed segments never make it into the event queue")
    }

    fn near(&self, p: Point, q: Point) -> bool {
        (p.x - q.x).abs() <= self.eps && (p.y - q.y).abs() <= self.eps
    }

    fn inconsistency(&self, p: Point) -> Error {
        Error::SweepInconsistency {
            point: self.lattice.from_grid(p),
        }
    }

    fn step(&mut self, p: Point, event: Event) -> Result<(), Error> {
        // Find the contiguous range of segments passing through p.
        let lo = self
            .status
            .partition_point(|&s| self.seg(s).signed_distance(p) > self.eps);
        let mut hi = lo;
        while let Some(&s) = self.status.get(hi) {
            if self.seg(s).signed_distance(p) < -self.eps {
                break;
            }
            hi += 1;
        }
        let block: Vec<SegIdx> = (lo..hi).map(|i| self.status[i]).collect();

        if let Some(missing) = event
            .ends
            .iter()
            .chain(&event.crossings)
            .find(|s| !block.contains(s))
        {
            tracing::error!(?missing, ?p, "segment not found on the sweep-line");
            return Err(self.inconsistency(p));
        }

        let mut here: Vec<SegIdx> = block.iter().chain(&event.starts).copied().collect();
        here.sort();
        here.dedup();
        if here.len() >= 2 && self.is_reportable(&here, p) {
            self.out.push(IntersectionPoint {
                point: self.lattice.from_grid(p),
                segments: here,
            });
        }

        // Replace the block by the segments continuing past p, ordered by how
        // they leave it.
        for _ in lo..hi {
            self.status.remove(lo);
        }
        let mut next: Vec<SegIdx> = block
            .into_iter()
            .filter(|s| !event.ends.contains(s))
            .chain(event.starts)
            .collect();
        next.sort_by(|&a, &b| self.seg(a).cmp_slope(self.seg(b)).then(a.cmp(&b)));
        for (i, &s) in next.iter().enumerate() {
            self.status.insert(lo + i, s);
        }

        if next.is_empty() {
            if lo > 0 && lo < self.status.len() {
                self.check_pair(lo - 1, lo, p)?;
            }
        } else {
            if lo > 0 {
                self.check_pair(lo - 1, lo, p)?;
            }
            let top = lo + next.len();
            if top < self.status.len() {
                self.check_pair(top - 1, top, p)?;
            }
        }
        Ok(())
    }

    // Schedules a crossing event if the segments at these two status positions cross after p.
    //
    // Neighbors can cross behind the sweep-line: they swapped there, and
    // later the segments that separated them went away.
    fn check_pair(&mut self, i: usize, j: usize, p: Point) -> Result<(), Error> {
        let a = self.status[i];
        let b = self.status[j];
        let (sa, sb) = (self.seg(a), self.seg(b));
        if !sa.is_vertical() && !sb.is_vertical() && sa.cmp_slope(sb) != Ordering::Greater {
            // `a` is below `b` and they're moving apart.
            return Ok(());
        }
        let Some(q) = crossing_point(sa, sb) else {
            return Ok(());
        };
        if self.near(p, q) {
            // Both of them pass through p, so they're already taken care of.
            return Ok(());
        }
        if q < p {
            tracing::trace!(?a, ?b, ?q, "crossing already swept");
            return Ok(());
        }
        // Merge with nearby events conservatively, so that the merged event
        // point stays within eps of both segments.
        self.queue.push_crossing(q, a, b, self.eps / 2.0);
        Ok(())
    }

    // Is there a pair of segments at p that isn't just two neighbors in a
    // contour meeting at their common vertex?
    fn is_reportable(&self, here: &[SegIdx], p: Point) -> bool {
        if !self.ignore_adjacent {
            return true;
        }
        let joined_at_p = |a: SegIdx, b: SegIdx| {
            self.segments.contour_next(a) == Some(b) && self.drawn[a.0].1.to_f64() == p
        };
        here.iter().enumerate().any(|(i, &a)| {
            here[i + 1..]
                .iter()
                .any(|&b| !joined_at_p(a, b) && !joined_at_p(b, a))
        })
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self, p: Point) {
        self.status.check_invariants();
        // Relative to p, the status goes: segments below, segments through, segments above.
        let classes: Vec<u8> = self
            .status
            .iter()
            .map(|&s| {
                let d = self.seg(s).signed_distance(p);
                if d > self.eps {
                    0
                } else if d < -self.eps {
                    2
                } else {
                    1
                }
            })
            .collect();
        assert!(
            classes.windows(2).all(|w| w[0] <= w[1]),
            "bad status order {classes:?} at {p:?}"
        );
    }
}
