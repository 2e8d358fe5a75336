use criterion::{black_box, criterion_group, criterion_main, Criterion};

use contour_trimmer::{
    generators::{checkerboard, circles, slanted_checkerboard},
    intersect, Contour, ContourIdx, Segments, SweepOptions, TrimOptions, Trimmer,
};

fn segments(contours: &[Contour]) -> Segments {
    let options = TrimOptions::default().segment_options().unwrap();
    let mut segs = Segments::default();
    for (i, c) in contours.iter().enumerate() {
        segs.add_contour(c, ContourIdx(i), &options).unwrap();
    }
    segs
}

fn just_the_sweep(c: &mut Criterion) {
    let segs = segments(&checkerboard(10));
    let slanted = segments(&slanted_checkerboard(10));
    let opts = SweepOptions::default();

    c.bench_function("just the sweep", |b| {
        b.iter(|| black_box(intersect(&segs, &opts).unwrap()))
    });
    c.bench_function("just the sweep, slanted", |b| {
        b.iter(|| black_box(intersect(&slanted, &opts).unwrap()))
    });
}

fn whole_pipeline(c: &mut Criterion) {
    let squares = checkerboard(10);
    let round = circles(20);
    let trimmer = Trimmer::default();

    c.bench_function("trim checkerboard", |b| {
        b.iter(|| black_box(trimmer.run(&squares).unwrap()))
    });
    c.bench_function("trim circles", |b| {
        b.iter(|| black_box(trimmer.run(&round).unwrap()))
    });
}

criterion_group!(benches, just_the_sweep, whole_pipeline);
criterion_main!(benches);
