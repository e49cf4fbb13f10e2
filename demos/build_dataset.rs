//! Generate a leakage-free training set, persist it, and score a baseline.
//!
//! Run with: cargo run --example build_dataset
//! Set `RUST_LOG=exotransit=debug` for stage-level logging.

use exotransit::classify::{
    evaluate, select_features, CentroidClassifier, Classifier, DEFAULT_THRESHOLD,
};
use exotransit::dataset::{read_feature_table_file, DatasetConfig};
use exotransit::prelude::*;
use tracing_subscriber::EnvFilter;

/// Deterministic scatter around 1.0 with an optional box dip.
fn synthetic_star(seed: u64, period: Option<f64>) -> LightCurve {
    let time: Vec<f64> = (0..1500).map(|i| i as f64 * 0.02).collect();
    let flux = time
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let noise = (((i as u64 * 7919 + seed * 104_729) % 1000) as f64 - 500.0) * 4e-7;
            let dip = match period {
                Some(p) if t % p < 0.12 => 0.006,
                _ => 0.0,
            };
            1.0 + noise - dip
        })
        .collect();
    LightCurve::new(time, flux).unwrap()
}

fn main() -> exotransit::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== exotransit dataset generation ===\n");

    // 1. A small labelled catalog
    let mut source = InMemorySource::new();
    let mut targets = Vec::new();
    for i in 0..8u64 {
        let id = format!("Kepler-{}", 200 + i);
        source.insert(id.clone(), synthetic_star(i, Some(1.5 + 0.4 * i as f64)));
        targets.push((id, Label::Transit));

        let id = format!("KIC {}", 5_000 + i);
        source.insert(id.clone(), synthetic_star(i + 40, None));
        targets.push((id, Label::NoTransit));
    }
    println!("Catalog: {} targets", targets.len());

    // 2. Split first, then augment each partition
    let config = PipelineConfig {
        dataset: DatasetConfig::default().with_total_size(120),
        ..PipelineConfig::default()
    };
    let dataset = config.dataset_builder(source).build(&targets)?;
    println!(
        "Train: {} samples, test: {} samples, leaked roots: {}",
        dataset.train.len(),
        dataset.test.len(),
        dataset.leaked_roots().len()
    );

    // 3. Persist and reload the feature tables
    let dir = std::env::temp_dir().join("exotransit-demo");
    std::fs::create_dir_all(&dir)?;
    let (train_path, test_path) = (dir.join("train.csv"), dir.join("test.csv"));
    dataset.write_csv(&train_path, &test_path)?;
    let train = read_feature_table_file(&train_path)?.dedup_by_signature();
    let test = read_feature_table_file(&test_path)?;
    println!(
        "Wrote {} and {} ({} feature columns)",
        train_path.display(),
        test_path.display(),
        train.columns().len()
    );

    // 4. Baseline model on the most informative features
    let mut probe = CentroidClassifier::new();
    probe.fit(train.rows(), train.labels(), train.columns())?;
    let schema = select_features(&probe.feature_importance());
    println!("\nSelected {} of {} features", schema.len(), train.columns().len());

    let aligned: Vec<Vec<f64>> = (0..train.len())
        .map(|i| schema.align_pairs(train.row_pairs(i)))
        .collect();
    let mut model = CentroidClassifier::new();
    model.fit(&aligned, train.labels(), schema.columns())?;

    let evaluation = evaluate(&model, &test, &schema, DEFAULT_THRESHOLD)?;
    println!("\n--- Held-out evaluation ({}) ---", model.name());
    println!("Accuracy: {:.3}", evaluation.accuracy);
    println!(
        "{:>10} {:>10} {:>10} {:>10} {:>8}",
        "class", "precision", "recall", "f1", "support"
    );
    for (name, report) in [("transit", evaluation.transit), ("none", evaluation.no_transit)] {
        println!(
            "{:>10} {:>10.3} {:>10.3} {:>10.3} {:>8}",
            name, report.precision, report.recall, report.f1, report.support
        );
    }

    schema.save(dir.join("schema.json"))?;
    Ok(())
}
