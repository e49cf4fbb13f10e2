//! Benchmarks for the Box Least Squares period search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exotransit::core::LightCurve;
use exotransit::detection::{BlsConfig, BoxLeastSquares};

fn generate_transiting(n: usize, period: f64) -> LightCurve {
    let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.02).collect();
    let flux = time
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let noise = ((i * 7919 % 1000) as f64 - 500.0) * 1e-6;
            let dip = if t % period < 0.12 { 0.005 } else { 0.0 };
            1.0 + noise - dip
        })
        .collect();
    LightCurve::new(time, flux).unwrap()
}

fn bench_periodogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls_periodogram");
    group.sample_size(20);

    for size in [1_000, 5_000, 20_000].iter() {
        let lc = generate_transiting(*size, 3.7);
        let finder = BoxLeastSquares::new(BlsConfig::default().with_period_grid(0.5, 10.0, 1000));

        group.bench_with_input(BenchmarkId::new("samples", size), size, |b, _| {
            b.iter(|| finder.periodogram(black_box(&lc)))
        });
    }

    group.finish();
}

fn bench_grid_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls_grid");
    group.sample_size(10);
    let lc = generate_transiting(5_000, 3.7);

    for n_periods in [500, 2_000, 5_000].iter() {
        let finder =
            BoxLeastSquares::new(BlsConfig::default().with_period_grid(0.5, 20.0, *n_periods));
        group.bench_with_input(BenchmarkId::new("periods", n_periods), n_periods, |b, _| {
            b.iter(|| finder.find_period(black_box(Some(&lc))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_periodogram, bench_grid_resolution);
criterion_main!(benches);
