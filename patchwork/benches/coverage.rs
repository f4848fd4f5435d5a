use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use patchwork::{find_efficient_coverage, Config, Source};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn clumped_catalog(count: usize) -> Vec<Source> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let clumps: Vec<(f64, f64)> = (0..8)
        .map(|_| (rng.random_range(0.0..500.0), rng.random_range(0.0..500.0)))
        .collect();
    (0..count)
        .map(|i| {
            let (cx, cy) = clumps[i % clumps.len()];
            Source::new(
                cx + rng.random_range(-6.0..6.0),
                cy + rng.random_range(-6.0..6.0),
            )
        })
        .collect()
}

fn benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_efficient_coverage");
    group.sample_size(20);

    for count in [100, 400, 1000] {
        let catalog = clumped_catalog(count);
        for parallel in [false, true] {
            let config = Config::default().with_border(2.0).with_parallel(parallel);
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &catalog, |b, catalog| {
                b.iter(|| find_efficient_coverage(black_box(catalog.iter().copied()), config))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
