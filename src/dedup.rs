//! Removing pieces that coincide with other pieces.

use std::collections::HashSet;

use crate::{
    geom::Point,
    num::{CheapOrderedFloat, Lattice},
    split::TrimGroup,
};

type Key = [CheapOrderedFloat; 4];

fn key(a: Point, b: Point, lattice: &Lattice) -> Key {
    // Adding zero turns -0.0 into 0.0, so they hash the same.
    let round = |p: Point| {
        let p = lattice.round_point(p);
        Point {
            x: p.x + 0.0,
            y: p.y + 0.0,
        }
    };
    let (a, b) = (round(a), round(b));
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    [lo.x, lo.y, hi.x, hi.y].map(CheapOrderedFloat::from)
}

/// Removes every piece that has the same endpoints (in either direction) as an earlier one.
///
/// Endpoints are compared after rounding them to `lattice`. "Earlier" means
/// earlier in `groups` (and, within a group, earlier in the group), unless
/// `reverse` is true, in which case everything is visited back to front and
/// the last copy of each piece survives. Groups that end up empty are
/// dropped; otherwise, the order is preserved.
pub fn dedup(groups: Vec<TrimGroup>, reverse: bool, lattice: &Lattice) -> Vec<TrimGroup> {
    let mut seen = HashSet::new();
    let mut keep: Vec<Vec<bool>> = groups
        .iter()
        .map(|g| vec![false; g.pieces.len()])
        .collect();

    let mut visit = |gi: usize, pi: usize| {
        let piece = &groups[gi].pieces[pi];
        keep[gi][pi] = seen.insert(key(piece.start, piece.end, lattice));
    };
    if reverse {
        for gi in (0..groups.len()).rev() {
            for pi in (0..groups[gi].pieces.len()).rev() {
                visit(gi, pi);
            }
        }
    } else {
        for gi in 0..groups.len() {
            for pi in 0..groups[gi].pieces.len() {
                visit(gi, pi);
            }
        }
    }

    let before: usize = groups.iter().map(|g| g.pieces.len()).sum();
    let ret: Vec<TrimGroup> = groups
        .into_iter()
        .zip(keep)
        .filter_map(|(mut g, keep)| {
            let mut keep = keep.into_iter();
            g.pieces.retain(|_| keep.next().unwrap_or(false));
            (!g.pieces.is_empty()).then_some(g)
        })
        .collect();
    let after: usize = ret.iter().map(|g| g.pieces.len()).sum();
    tracing::debug!(removed = before - after, reverse, "removed duplicate pieces");
    ret
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        contour::{ContourIdx, Style},
        geom::SegmentMeta,
        segments::SegIdx,
        split::TrimPiece,
    };

    fn piece(a: (f64, f64), b: (f64, f64), style: &str) -> TrimPiece {
        TrimPiece {
            start: a.into(),
            end: b.into(),
            intersected: false,
            meta: SegmentMeta {
                style: Style::new(style),
                ..SegmentMeta::plain(ContourIdx(0))
            },
        }
    }

    fn group(seg: usize, pieces: Vec<TrimPiece>) -> TrimGroup {
        TrimGroup {
            seg: SegIdx(seg),
            pieces,
        }
    }

    fn styles(groups: &[TrimGroup]) -> Vec<&str> {
        groups
            .iter()
            .flat_map(|g| g.pieces.iter().map(|p| p.meta.style.as_str()))
            .collect()
    }

    fn lattice() -> Lattice {
        Lattice::new(3).unwrap()
    }

    #[test]
    fn reversed_duplicates() {
        let groups = vec![
            group(0, vec![piece((1.0, 1.0), (2.0, 2.0), "first")]),
            group(1, vec![piece((2.0, 2.0), (1.0, 1.0), "second")]),
        ];

        let forward = dedup(groups.clone(), false, &lattice());
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].seg, SegIdx(0));
        assert_eq!(styles(&forward), vec!["first"]);

        let backward = dedup(groups, true, &lattice());
        assert_eq!(backward.len(), 1);
        assert_eq!(styles(&backward), vec!["second"]);
    }

    #[test]
    fn rounding_and_order() {
        let groups = vec![
            group(
                0,
                vec![
                    piece((0.0, 0.0), (1.0, 0.0), "a"),
                    piece((1.0, 0.0), (2.0, 0.0), "b"),
                ],
            ),
            group(
                1,
                vec![
                    piece((1.0002, 0.0), (-0.0001, 0.0), "c"),
                    piece((5.0, 5.0), (6.0, 6.0), "d"),
                ],
            ),
        ];
        assert_eq!(styles(&dedup(groups, false, &lattice())), vec!["a", "b", "d"]);
    }

    fn small_groups() -> impl Strategy<Value = Vec<TrimGroup>> {
        let pt = (0i32..4, 0i32..4).prop_map(|(x, y)| (x as f64, y as f64));
        let one = (pt.clone(), pt).prop_map(|(a, b)| piece(a, b, ""));
        proptest::collection::vec(proptest::collection::vec(one, 0..4), 0..6).prop_map(|gs| {
            gs.into_iter()
                .enumerate()
                .map(|(i, pieces)| group(i, pieces))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn idempotent(groups in small_groups(), reverse in any::<bool>()) {
            let once = dedup(groups, reverse, &lattice());
            let twice = dedup(once.clone(), reverse, &lattice());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn no_duplicates_left(groups in small_groups(), reverse in any::<bool>()) {
            let out = dedup(groups, reverse, &lattice());
            let mut keys = HashSet::new();
            for p in out.iter().flat_map(|g| &g.pieces) {
                prop_assert!(keys.insert(key(p.start, p.end, &lattice())));
            }
            prop_assert!(out.iter().all(|g| !g.pieces.is_empty()));
        }
    }
}
