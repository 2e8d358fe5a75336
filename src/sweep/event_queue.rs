use std::{collections::BTreeMap, ops::Bound};

use crate::{geom::Point, segments::SegIdx};

/// Everything that happens at one sweep-line event point.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Event {
    /// Segments whose left endpoint is here.
    pub starts: Vec<SegIdx>,
    /// Segments whose right endpoint is here.
    pub ends: Vec<SegIdx>,
    /// Segments that were found to cross one another here.
    pub crossings: Vec<SegIdx>,
}

/// The pending events, ordered by their point.
///
/// Points are in lattice units. Endpoint events sit exactly on lattice
/// points; crossing events usually don't.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventQueue {
    events: BTreeMap<Point, Event>,
}

impl EventQueue {
    pub fn push_start(&mut self, p: Point, seg: SegIdx) {
        self.events.entry(p).or_default().starts.push(seg);
    }

    pub fn push_end(&mut self, p: Point, seg: SegIdx) {
        self.events.entry(p).or_default().ends.push(seg);
    }

    /// Records that `a` and `b` cross at `p`.
    ///
    /// If there's already an event within `eps` of `p` (in both coordinates),
    /// the crossing joins that event instead of getting its own.
    pub fn push_crossing(&mut self, p: Point, a: SegIdx, b: SegIdx, eps: f64) {
        let key = self.find_near(p, eps).unwrap_or(p);
        let crossings = &mut self.events.entry(key).or_default().crossings;
        for s in [a, b] {
            if !crossings.contains(&s) {
                crossings.push(s);
            }
        }
    }

    fn find_near(&self, p: Point, eps: f64) -> Option<Point> {
        let mut lower = Bound::Included(Point {
            x: p.x - eps,
            y: f64::NEG_INFINITY,
        });
        // Visit the (usually one or zero) distinct x coordinates within eps,
        // and look for a close-enough y in each of them.
        while let Some((&k, _)) = self.events.range((lower, Bound::Unbounded)).next() {
            if k.x > p.x + eps {
                break;
            }
            let column = Point::new(k.x, p.y - eps)..=Point::new(k.x, p.y + eps);
            if let Some((&near, _)) = self.events.range(column).next() {
                return Some(near);
            }
            lower = Bound::Excluded(Point {
                x: k.x,
                y: f64::INFINITY,
            });
        }
        None
    }

    pub fn pop(&mut self) -> Option<(Point, Event)> {
        self.events.pop_first()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
