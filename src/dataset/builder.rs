//! Labelled training/test feature sets from a target catalog.

use super::split::{leaked_roots, stratified_split, SplitConfig};
use super::table::{write_feature_table_file, FeatureTable, Sample};
use crate::augment::Augmenter;
use crate::core::{Label, LightCurve, Mission, Outcome};
use crate::error::{Result, TransitError};
use crate::features::FeatureExtractor;
use crate::preprocess::{Preprocessor, Quality};
use crate::source::{fetch_with_retry, SignalSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Configuration for [`DatasetBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Requested sample count over both partitions.
    pub total_size: usize,
    /// Fewest usable seed targets needed to build anything.
    pub min_targets: usize,
    /// Balance the test partition too (off: test keeps only real seeds).
    pub augment_test: bool,
    /// Seed of the augmentation generator.
    pub seed: u64,
    /// Cleaning quality for seed curves.
    pub quality: Quality,
    /// Calls made to the source before a target is given up.
    pub fetch_attempts: usize,
    pub split: SplitConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            total_size: 500,
            min_targets: 6,
            augment_test: false,
            seed: 42,
            quality: Quality::Auto,
            fetch_attempts: 3,
            split: SplitConfig::default(),
        }
    }
}

impl DatasetConfig {
    pub fn with_total_size(mut self, total_size: usize) -> Self {
        self.total_size = total_size;
        self
    }

    pub fn with_min_targets(mut self, min_targets: usize) -> Self {
        self.min_targets = min_targets;
        self
    }

    pub fn with_augment_test(mut self, augment_test: bool) -> Self {
        self.augment_test = augment_test;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    /// Per-class size of the balanced train partition.
    pub fn train_per_class(&self) -> usize {
        let train_total = (self.total_size as f64 * (1.0 - self.split.test_ratio)) as usize;
        train_total / 2
    }

    /// Per-class size of the test partition when it is balanced.
    pub fn test_per_class(&self) -> usize {
        let test_total = (self.total_size as f64 * self.split.test_ratio) as usize;
        test_total / 2
    }
}

/// Disjoint train and test samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingDataset {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl TrainingDataset {
    /// Source roots present in both partitions; empty for a sound split.
    pub fn leaked_roots(&self) -> Vec<String> {
        leaked_roots(
            self.train.iter().map(Sample::target_id),
            self.test.iter().map(Sample::target_id),
        )
    }

    pub fn train_table(&self) -> FeatureTable {
        FeatureTable::from_samples(&self.train)
    }

    pub fn test_table(&self) -> FeatureTable {
        FeatureTable::from_samples(&self.test)
    }

    /// Write both partitions as feature tables.
    pub fn write_csv(&self, train_path: impl AsRef<Path>, test_path: impl AsRef<Path>) -> Result<()> {
        write_feature_table_file(&self.train, train_path)?;
        write_feature_table_file(&self.test, test_path)
    }
}

/// Turns a labelled target catalog into a [`TrainingDataset`].
///
/// Seeds are fetched and cleaned, split by source target, and only then
/// augmented, so no seed's synthetic siblings cross the split.
pub struct DatasetBuilder<S: SignalSource> {
    source: S,
    preprocessor: Preprocessor,
    augmenter: Augmenter,
    extractor: FeatureExtractor,
    config: DatasetConfig,
}

impl<S: SignalSource> DatasetBuilder<S> {
    pub fn new(source: S, config: DatasetConfig) -> Self {
        Self {
            source,
            preprocessor: Preprocessor::default(),
            augmenter: Augmenter::default(),
            extractor: FeatureExtractor::default(),
            config,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_augmenter(mut self, augmenter: Augmenter) -> Self {
        self.augmenter = augmenter;
        self
    }

    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Fetch and clean every target, skipping the unusable ones.
    pub fn acquire(&self, targets: &[(String, Label)]) -> Vec<(LightCurve, Label)> {
        let mut seeds = Vec::with_capacity(targets.len());
        for (id, label) in targets {
            let mission = Mission::infer(id);
            let raw = match fetch_with_retry(&self.source, id, mission, self.config.fetch_attempts) {
                Outcome::Found(lc) => lc,
                _ => {
                    warn!(target_id = %id, "seed skipped: not found");
                    continue;
                }
            };
            match self.preprocessor.clean(Some(&raw), self.config.quality) {
                Outcome::Found(lc) => {
                    info!(target_id = %id, points = lc.len(), "seed acquired");
                    seeds.push((lc.with_target_id(id.as_str()), *label));
                }
                other => warn!(target_id = %id, outcome = ?other.map(|_| ()), "seed skipped"),
            }
        }
        seeds
    }

    /// Build the dataset from `(target id, label)` pairs.
    pub fn build(&self, targets: &[(String, Label)]) -> Result<TrainingDataset> {
        let seeds = self.acquire(targets);
        if seeds.len() < self.config.min_targets {
            return Err(TransitError::InsufficientData {
                needed: self.config.min_targets,
                got: seeds.len(),
            });
        }

        let ids: Vec<&str> = seeds.iter().map(|(lc, _)| lc.target_id().unwrap_or("")).collect();
        let labels: Vec<Label> = seeds.iter().map(|(_, l)| *l).collect();
        let split = stratified_split(&ids, &labels, &self.config.split)?;
        let pick = |idx: &[usize]| -> (Vec<LightCurve>, Vec<Label>) {
            idx.iter().map(|&i| (seeds[i].0.clone(), seeds[i].1)).unzip()
        };
        let (train_base, train_labels) = pick(&split.train);
        let (test_base, test_labels) = pick(&split.test);
        info!(
            train = train_base.len(),
            test = test_base.len(),
            "seeds partitioned"
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (train_curves, train_labels) = self.augmenter.augment_balanced(
            &train_base,
            &train_labels,
            self.config.train_per_class(),
            &mut rng,
        )?;
        let (test_curves, test_labels) = if self.config.augment_test {
            self.augmenter.augment_balanced(
                &test_base,
                &test_labels,
                self.config.test_per_class(),
                &mut rng,
            )?
        } else {
            (test_base, test_labels)
        };

        let dataset = TrainingDataset {
            train: self.extract_all(&train_curves, &train_labels),
            test: self.extract_all(&test_curves, &test_labels),
        };
        let leaked = dataset.leaked_roots();
        if !leaked.is_empty() {
            return Err(TransitError::InvalidParameter(format!(
                "train/test leakage through {}",
                leaked.join(", ")
            )));
        }
        info!(
            train = dataset.train.len(),
            test = dataset.test.len(),
            "leakage check passed"
        );
        Ok(dataset)
    }

    fn extract_all(&self, curves: &[LightCurve], labels: &[Label]) -> Vec<Sample> {
        curves
            .iter()
            .zip(labels)
            .enumerate()
            .filter_map(|(i, (lc, &label))| {
                let id = lc
                    .target_id()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("sample{i}"));
                match self.extractor.extract(lc, &id) {
                    Outcome::Found(features) => Some(Sample::new(features, label)),
                    other => {
                        warn!(target_id = %id, outcome = ?other.map(|_| ()), "sample skipped");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::source_root;
    use crate::detection::find_period;
    use crate::source::InMemorySource;

    fn star(seed: u64, dip: bool) -> LightCurve {
        let time: Vec<f64> = (0..600).map(|i| i as f64 * 0.02).collect();
        let flux: Vec<f64> = time
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let noise = (((i as u64 * 7919 + seed * 104729) % 1000) as f64 - 500.0) * 2e-7;
                let depth = if dip && t % 2.5 < 0.1 { 0.008 } else { 0.0 };
                1.0 + noise - depth
            })
            .collect();
        LightCurve::new(time, flux).unwrap()
    }

    fn catalog() -> (InMemorySource, Vec<(String, Label)>) {
        let mut source = InMemorySource::new();
        let mut targets = Vec::new();
        for i in 0..5 {
            let id = format!("Kepler-{}", 100 + i);
            source.insert(id.clone(), star(i, true));
            targets.push((id, Label::Transit));
            let id = format!("KIC {}", 2000 + i);
            source.insert(id.clone(), star(i + 50, false));
            targets.push((id, Label::NoTransit));
        }
        targets.push(("KIC 404".to_string(), Label::NoTransit));
        (source, targets)
    }

    // ==== build ====

    #[test]
    fn builds_balanced_train_and_raw_test() {
        let (source, targets) = catalog();
        let config = DatasetConfig::default().with_total_size(40);
        let builder = DatasetBuilder::new(source, config);
        let dataset = builder.build(&targets).unwrap();

        // 40 * 0.8 / 2 = 16 per class
        assert_eq!(dataset.train.len(), 32);
        let positives = dataset.train.iter().filter(|s| s.label.is_positive()).count();
        assert_eq!(positives, 16);
        // round(0.2 * 5) = 1 real seed per class
        assert_eq!(dataset.test.len(), 2);
        assert!(dataset
            .test
            .iter()
            .all(|s| source_root(s.target_id()) == s.target_id()));
        assert!(dataset.leaked_roots().is_empty());
        // Injection never reaches negatives
        assert!(dataset
            .train
            .iter()
            .filter(|s| s.target_id().contains("_inj"))
            .all(|s| s.label.is_positive()));
    }

    #[test]
    fn augmented_test_partition_is_balanced_separately() {
        let (source, targets) = catalog();
        let config = DatasetConfig::default()
            .with_total_size(40)
            .with_augment_test(true);
        let dataset = DatasetBuilder::new(source, config).build(&targets).unwrap();
        assert_eq!(dataset.test.len(), 8);
        assert!(dataset.leaked_roots().is_empty());
    }

    #[test]
    fn too_few_targets_is_an_error() {
        let (source, targets) = catalog();
        let err = DatasetBuilder::new(source, DatasetConfig::default())
            .build(&targets[..4])
            .unwrap_err();
        assert_eq!(err, TransitError::InsufficientData { needed: 6, got: 4 });

        let (source, targets) = catalog();
        let config = DatasetConfig::default().with_total_size(20).with_min_targets(4);
        let dataset = DatasetBuilder::new(source, config).build(&targets[..4]).unwrap();
        assert_eq!(dataset.train.len(), 16);
        assert_eq!(dataset.test.len(), 2);
    }

    #[test]
    fn dataset_is_reproducible_and_writable() {
        let (source, targets) = catalog();
        let config = DatasetConfig::default().with_total_size(20);
        let builder = DatasetBuilder::new(source, config);
        let a = builder.build(&targets).unwrap();
        let b = builder.build(&targets).unwrap();
        assert_eq!(a, b);

        let dir = tempfile::tempdir().unwrap();
        let (train, test) = (dir.path().join("train.csv"), dir.path().join("test.csv"));
        a.write_csv(&train, &test).unwrap();
        let loaded = crate::dataset::read_feature_table_file(&train).unwrap();
        assert_eq!(loaded.len(), a.train.len());
        assert_eq!(loaded.ids(), a.train_table().ids());
    }

    #[test]
    fn acquired_seed_keeps_its_transit() {
        let (source, _) = catalog();
        let builder = DatasetBuilder::new(source, DatasetConfig::default());
        let seeds = builder.acquire(&[("Kepler-100".to_string(), Label::Transit)]);
        assert_eq!(seeds.len(), 1);
        let period = find_period(Some(&seeds[0].0));
        assert!((period - 2.5).abs() < 0.05, "period {period}");
    }
}
