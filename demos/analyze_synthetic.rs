//! Analyze synthetic targets through a cached analysis context.
//!
//! Run with: cargo run --example analyze_synthetic
//! Set `RUST_LOG=exotransit=debug` for stage-level logging.

use exotransit::augment::inject_synthetic_transit;
use exotransit::classify::AnalysisContext;
use exotransit::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn quiet_star(n: usize, seed: u64) -> LightCurve {
    let time: Vec<f64> = (0..n).map(|i| 1_000.0 + i as f64 * 0.02).collect();
    let flux = (0..n)
        .map(|i| 1.0 + (((i as u64 * 7919 + seed) % 1000) as f64 - 500.0) * 4e-7)
        .collect();
    LightCurve::new(time, flux).unwrap()
}

fn main() -> exotransit::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== exotransit analysis ===\n");

    // 1. One transiting and one quiet target
    let mut rng = StdRng::seed_from_u64(7);
    let injected = inject_synthetic_transit(&quiet_star(2000, 1), 5.0, 3.0, 0.01, &mut rng)?;
    println!(
        "Injected P={:.2} d, duration={:.1} h, depth={:.3} at epoch {:.3}",
        injected.params.period,
        injected.params.duration_hours,
        injected.params.depth,
        injected.params.epoch
    );

    let source = InMemorySource::new()
        .with_curve("Kepler-5b", injected.curve)
        .with_curve("TIC 1234", quiet_star(2000, 99));

    // 2. Analyze, twice for the cache
    let mut ctx = AnalysisContext::new(source);
    for target in ["Kepler-5b", "TIC 1234", "Kepler-5b", "KIC 404"] {
        match ctx.analyze(target)? {
            Outcome::Found(report) => println!(
                "{:>10} [{}] period={:.4} d  SDE={:.1}  depth_min={:.4}  score={:.2}  points={}/{}",
                report.target_id,
                report.mission,
                report.period,
                report.sde,
                report.transit_depth_min,
                report.score,
                report.cleaned_points,
                report.raw_points
            ),
            Outcome::NotFound => println!("{target:>10} not found"),
            Outcome::InsufficientData { needed, got } => {
                println!("{target:>10} too few samples ({got} < {needed})")
            }
        }
    }

    // 3. Context state
    let status = ctx.status();
    println!(
        "\nModel loaded: {}, cached reports: {}/{}",
        status.model_loaded, status.cached, status.cache_capacity
    );
    Ok(())
}
