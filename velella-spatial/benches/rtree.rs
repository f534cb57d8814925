use criterion::{black_box, criterion_group, criterion_main, Criterion};
use velella_spatial::IntervalRTree;

fn random_f64(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn random_intervals(n: usize) -> Vec<(f64, f64)> {
    let starts = random_f64(n, 42);
    let widths = random_f64(n, 7);
    (0..n)
        .map(|i| {
            let lo = starts[i] * 10_000.0;
            (lo, lo + widths[i] * 50.0)
        })
        .collect()
}

fn indexed(intervals: &[(f64, f64)]) -> IntervalRTree<usize> {
    let mut index = IntervalRTree::new();
    for (i, &(lo, hi)) in intervals.iter().enumerate() {
        index.insert(lo, hi, i).unwrap();
    }
    index.build();
    index
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &n in &[1_000usize, 100_000] {
        let intervals = random_intervals(n);
        group.bench_function(format!("{n}_intervals"), |b| {
            b.iter(|| {
                let index = indexed(black_box(&intervals));
                black_box(index.len())
            })
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let intervals = random_intervals(100_000);
    let mut index = indexed(&intervals);

    group.bench_function("100k_indexed", |b| {
        b.iter(|| black_box(index.count_overlaps(black_box(2_500.0), black_box(2_520.0))))
    });

    group.bench_function("100k_linear_scan", |b| {
        b.iter(|| {
            intervals
                .iter()
                .filter(|&&(lo, hi)| lo <= 2_520.0 && 2_500.0 <= hi)
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
