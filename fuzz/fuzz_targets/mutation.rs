#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use contour_trimmer::treevec::TreeVec;
use libfuzzer_sys::fuzz_target;

// Drives a `TreeVec` the way the sweep-line drives its status: it stays
// sorted, and each step finds the block of entries at some height, takes it
// out and puts a new block back in the same place.
#[derive(Arbitrary, Debug)]
enum Step {
    /// Something starts at `height`.
    Start { height: i8 },
    /// Everything at `height` ends.
    End { height: i8 },
    /// Everything at `height` leaves it again, along with `extra` newcomers.
    Pass { height: i8, extra: u8 },
}

fn block(status: &TreeVec<i8, 4>, height: i8) -> (usize, usize) {
    let lo = status.partition_point(|&h| h < height);
    let mut hi = lo;
    while status.get(hi) == Some(&height) {
        hi += 1;
    }
    (lo, hi)
}

fn replace(status: &mut TreeVec<i8, 4>, model: &mut Vec<i8>, height: i8, count: usize) {
    let (lo, hi) = block(status, height);
    assert_eq!(lo, model.partition_point(|&h| h < height));
    for _ in lo..hi {
        assert_eq!(status.remove(lo), Some(height));
    }
    model.drain(lo..hi);
    for i in 0..count {
        status.insert(lo + i, height);
        model.insert(lo + i, height);
    }
}

fn sweep(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let mut status = TreeVec::<i8, 4>::default();
    let mut model = Vec::new();
    for _ in 0..u.arbitrary_len::<Step>()? {
        match u.arbitrary()? {
            Step::Start { height } => {
                let (lo, hi) = block(&status, height);
                replace(&mut status, &mut model, height, hi - lo + 1);
            }
            Step::End { height } => replace(&mut status, &mut model, height, 0),
            Step::Pass { height, extra } => {
                let (lo, hi) = block(&status, height);
                replace(&mut status, &mut model, height, hi - lo + usize::from(extra % 4));
            }
        }
        status.check_invariants();

        assert_eq!(status.len(), model.len());
        assert!(status.iter().zip(&model).all(|(a, b)| a == b));
        assert!(model.windows(2).all(|w| w[0] <= w[1]));
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = sweep(Unstructured::new(data));
});
