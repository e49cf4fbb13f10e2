//! End-to-end scenarios across the pipeline stages.
//!
//! Synthetic curves stand in for archive photometry so that every expected
//! value is known up front.

use exotransit::augment::{augment_balanced, source_root, transit_mask};
use exotransit::classify::{AnalysisContext, ContextConfig, NEUTRAL_SCORE};
use exotransit::dataset::{DatasetBuilder, DatasetConfig, SplitConfig};
use exotransit::detection::{BlsConfig, BoxLeastSquares};
use exotransit::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn flat_curve(n: usize, cadence: f64) -> LightCurve {
    let time: Vec<f64> = (0..n).map(|i| i as f64 * cadence).collect();
    LightCurve::new(time, vec![1.0; n]).unwrap()
}

/// Low-level deterministic scatter around 1.0, optionally with a box dip.
fn star(seed: u64, period: Option<f64>) -> LightCurve {
    let time: Vec<f64> = (0..600).map(|i| i as f64 * 0.02).collect();
    let flux = time
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let noise = (((i as u64 * 7919 + seed * 104_729) % 1000) as f64 - 500.0) * 2e-7;
            let dip = match period {
                Some(p) if t % p < 0.1 => 0.008,
                _ => 0.0,
            };
            1.0 + noise - dip
        })
        .collect();
    LightCurve::new(time, flux).unwrap()
}

fn catalog(per_class: u64) -> (InMemorySource, Vec<(String, Label)>) {
    let mut source = InMemorySource::new();
    let mut targets = Vec::new();
    for i in 0..per_class {
        let id = format!("Kepler-{}", 10 + i);
        source.insert(id.clone(), star(i, Some(2.0 + 0.25 * i as f64)));
        targets.push((id, Label::Transit));
        let id = format!("KIC {}", 3000 + i);
        source.insert(id.clone(), star(i + 100, None));
        targets.push((id, Label::NoTransit));
    }
    (source, targets)
}

// =============================================================================
// Injected transit is recovered
// =============================================================================

#[test]
fn injected_transit_is_recovered_end_to_end() {
    let mut rng = StdRng::seed_from_u64(2024);
    let injected = inject_synthetic_transit(&flat_curve(1000, 0.02), 5.0, 3.0, 0.01, &mut rng)
        .unwrap()
        .curve
        .with_target_id("synthetic");

    let period = find_period(Some(&injected));
    assert!(
        (period - 5.0).abs() / 5.0 < 0.01,
        "expected a period near 5.0, got {period}"
    );

    let features = extract(&injected, "synthetic").into_option().unwrap();
    assert!((features.get(FeatureId::SciTransitDepthMin) - 0.99).abs() < 1e-9);
    assert_eq!(features.target_id(), "synthetic");
}

#[test]
fn injection_only_touches_the_transit_window() {
    let base = star(3, None);
    let mut rng = StdRng::seed_from_u64(11);
    let injected = inject_synthetic_transit(&base, 5.0, 3.0, 0.01, &mut rng).unwrap();
    let mask = transit_mask(base.time(), &injected.params);

    assert!(mask.iter().any(|&m| m));
    for ((before, after), inside) in base.flux().iter().zip(injected.curve.flux()).zip(&mask) {
        if *inside {
            assert_eq!(*after, before - 0.01);
        } else {
            assert_eq!(after, before);
        }
    }
    assert_eq!(injected.curve.time(), base.time());
}

#[test]
fn folding_half_period_apart() {
    let period = 4.0;
    let lc = LightCurve::new(vec![0.0, period / 2.0, period], vec![1.0, 0.9, 1.0]).unwrap();
    let folded = fold(&lc, period, Some(0.0)).unwrap();
    // Sorted by phase with ties in time order: t=0, t=P, t=P/2
    assert_eq!(folded.phase(), &[0.0, 0.0, 0.5]);
    assert_eq!(folded.flux(), &[1.0, 1.0, 0.9]);
}

// =============================================================================
// Dataset generation
// =============================================================================

#[test]
fn balanced_expansion_keeps_every_seed() {
    let mut base = Vec::new();
    let mut labels = Vec::new();
    for i in 0..3 {
        base.push(star(i, Some(2.5)).with_target_id(format!("Kepler-{i}")));
        labels.push(Label::Transit);
    }
    for i in 0..5 {
        base.push(star(i + 20, None).with_target_id(format!("KIC {i}")));
        labels.push(Label::NoTransit);
    }

    let mut rng = StdRng::seed_from_u64(42);
    let (curves, out_labels) = augment_balanced(&base, &labels, 10, &mut rng).unwrap();

    assert_eq!(curves.len(), 20);
    assert_eq!(out_labels.iter().filter(|l| l.is_positive()).count(), 10);
    let ids: HashSet<&str> = curves.iter().filter_map(|c| c.target_id()).collect();
    for seed in &base {
        assert!(ids.contains(seed.target_id().unwrap()));
    }
    for (curve, label) in curves.iter().zip(&out_labels) {
        let root = source_root(curve.target_id().unwrap());
        let seed = base.iter().position(|s| s.target_id() == Some(root)).unwrap();
        assert_eq!(labels[seed], *label);
    }
}

#[test]
fn augmented_partitions_never_share_a_root() {
    let (source, targets) = catalog(8);
    let config = DatasetConfig::default()
        .with_total_size(60)
        .with_augment_test(true)
        .with_split(SplitConfig::default().with_test_ratio(0.3).with_seed(9));
    let dataset = DatasetBuilder::new(source, config).build(&targets).unwrap();

    assert!(dataset.test.len() > 2);
    let train_roots: HashSet<&str> = dataset
        .train
        .iter()
        .map(|s| source_root(s.target_id()))
        .collect();
    for sample in &dataset.test {
        assert!(
            !train_roots.contains(source_root(sample.target_id())),
            "{} leaked into the train partition",
            sample.target_id()
        );
    }
    assert!(dataset.leaked_roots().is_empty());
}

#[test]
fn feature_tables_share_one_schema() {
    let (source, targets) = catalog(4);
    let config = DatasetConfig::default().with_total_size(24);
    let dataset = DatasetBuilder::new(source, config).build(&targets).unwrap();

    let train = dataset.train_table();
    let test = dataset.test_table();
    assert_eq!(train.columns(), test.columns());
    assert_eq!(train.columns().len(), FeatureId::ALL.len());
    assert!(train
        .rows()
        .iter()
        .chain(test.rows())
        .all(|row| row.iter().all(|v| v.is_finite())));
}

#[test]
fn schema_is_stable_across_degenerate_series() {
    let constant = flat_curve(200, 0.02);
    let dipped = star(5, Some(1.5));

    let a = extract(&constant, "flat").into_option().unwrap();
    let b = extract(&dipped, "dipped").into_option().unwrap();

    let names_a: Vec<&str> = a.iter().map(|(name, _)| name).collect();
    let names_b: Vec<&str> = b.iter().map(|(name, _)| name).collect();
    assert_eq!(names_a, names_b);
    assert_eq!(a.get(FeatureId::Variance), 0.0);
    assert!(a.values().iter().all(|v| v.is_finite()));
}

// =============================================================================
// Analysis context
// =============================================================================

#[test]
fn analysis_reports_period_and_neutral_score() {
    let mut source = InMemorySource::new();
    source.insert("Kepler-77", star(1, Some(2.5)));
    let finder = BoxLeastSquares::new(BlsConfig::default().with_period_grid(1.0, 6.0, 1001));
    let mut ctx = AnalysisContext::with_config(source, ContextConfig::default())
        .with_period_finder(finder);

    let report = ctx.analyze("Kepler-77").unwrap().into_option().unwrap();
    assert_eq!(report.mission, Mission::Kepler);
    assert!((report.period - 2.5).abs() < 0.05, "got {}", report.period);
    assert_eq!(report.score, NEUTRAL_SCORE);
    assert_eq!(report.raw_points, 600);
    assert!(report.folded.len() <= 1000);

    assert!(!ctx.analyze("KIC 404").unwrap().is_found());
}
