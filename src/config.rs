//! Whole-pipeline configuration.

use crate::augment::{AugmentConfig, Augmenter};
use crate::classify::{AnalysisContext, ContextConfig};
use crate::dataset::{DatasetBuilder, DatasetConfig};
use crate::detection::{BlsConfig, BoxLeastSquares};
use crate::error::Result;
use crate::features::{FeatureConfig, FeatureExtractor};
use crate::preprocess::{PreprocessConfig, Preprocessor};
use crate::source::SignalSource;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of every stage.
///
/// Every field falls back to its default, so a JSON document only needs
/// the values it changes:
///
/// ```
/// use exotransit::config::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{"bls": {"n_periods": 2000}}"#).unwrap();
/// assert_eq!(config.bls.n_periods, 2000);
/// assert_eq!(config.preprocess.flatten.window_length, 401);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub bls: BlsConfig,
    pub augment: AugmentConfig,
    pub features: FeatureConfig,
    pub dataset: DatasetConfig,
    pub context: ContextConfig,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.preprocess.clone())
    }

    pub fn period_finder(&self) -> BoxLeastSquares {
        BoxLeastSquares::new(self.bls.clone())
    }

    pub fn augmenter(&self) -> Augmenter {
        Augmenter::new(self.augment.clone())
    }

    pub fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(self.features.clone())
    }

    /// Dataset builder wired with every configured stage.
    pub fn dataset_builder<S: SignalSource>(&self, source: S) -> DatasetBuilder<S> {
        DatasetBuilder::new(source, self.dataset.clone())
            .with_preprocessor(self.preprocessor())
            .with_augmenter(self.augmenter())
            .with_extractor(self.extractor())
    }

    /// Analysis context wired with every configured stage, without a model.
    pub fn analysis_context<S: SignalSource>(&self, source: S) -> AnalysisContext<S> {
        AnalysisContext::with_config(source, self.context.clone())
            .with_preprocessor(self.preprocessor())
            .with_period_finder(self.period_finder())
            .with_extractor(self.extractor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::Quality;
    use crate::source::InMemorySource;

    #[test]
    fn defaults_match_stage_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.bls.n_periods, 5000);
        assert_eq!(config.preprocess.auto_bin_threshold, 100_000);
        assert_eq!(config.augment.variants.noise_sigma, 0.00018);
        assert_eq!(config.features.min_samples, 10);
        assert_eq!(config.dataset.split.test_ratio, 0.2);
        assert_eq!(config.context.quality, Quality::Fast);
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let json = r#"{
            "preprocess": {"min_samples": 20},
            "dataset": {"total_size": 100, "split": {"seed": 7}},
            "context": {"cache_capacity": 4, "quality": "ultra"}
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.preprocess.min_samples, 20);
        assert_eq!(config.preprocess.clip, PipelineConfig::default().preprocess.clip);
        assert_eq!(config.dataset.total_size, 100);
        assert_eq!(config.dataset.split.seed, 7);
        assert_eq!(config.dataset.split.test_ratio, 0.2);
        assert_eq!(config.context.quality, Quality::Ultra);

        let ctx = config.analysis_context(InMemorySource::new());
        assert_eq!(ctx.status().cache_capacity, 4);
        assert_eq!(config.dataset_builder(InMemorySource::new()).config().total_size, 100);
    }

    #[test]
    fn json_round_trip_and_errors() {
        let config = PipelineConfig::default();
        let text = config.to_json_string().unwrap();
        let parsed = PipelineConfig::from_json_str(&text).unwrap();
        assert_eq!(parsed.bls.n_periods, config.bls.n_periods);
        assert_eq!(parsed.dataset, config.dataset);
        assert_eq!(parsed.context, config.context);
        assert!(PipelineConfig::from_json_str("{not json").is_err());
        assert!(PipelineConfig::from_json_file("/nonexistent/exotransit.json").is_err());
    }

    #[test]
    fn config_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{"features": {"min_samples": 50}}"#).unwrap();
        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.extractor().config().min_samples, 50);
    }
}
