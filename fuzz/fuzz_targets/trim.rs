#![no_main]

use arbitrary::Unstructured;

use contour_trimmer::{TrimOptions, Trimmer};
use libfuzzer_sys::fuzz_target;

fn trim(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let contours = contour_trimmer::arbitrary::contours(&mut u)?;
    let options = TrimOptions {
        decimals: u.int_in_range(0..=6)?,
        ignore_adjacent: u.arbitrary()?,
        remove_duplicates: u.arbitrary()?,
        reverse_removal_order: u.arbitrary()?,
        ..TrimOptions::default()
    };
    match Trimmer::new(options).unwrap().run(&contours) {
        Ok(out) => {
            for g in &out.groups {
                let seg = &out.segments[g.seg];
                assert_eq!(g.pieces[0].start, seg.start);
                assert_eq!(g.pieces.last().unwrap().end, seg.end);
            }
        }
        Err(e) => assert!(e.is_recoverable(), "{e}"),
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = trim(u);
});
