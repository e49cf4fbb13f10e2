//! Light curve to feature vector.

use super::catalog::{FeatureId, FeatureVector, SeriesSummary, FEATURE_COUNT};
use crate::core::{LightCurve, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for [`FeatureExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Fewest finite samples a curve needs to be characterized.
    pub min_samples: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { min_samples: 10 }
    }
}

impl FeatureConfig {
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }
}

/// Computes the fixed feature schema for a light curve.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract every feature of [`FeatureId::ALL`] from `lc`.
    ///
    /// Pairs with a non-finite time or flux are dropped and the rest is
    /// ordered by time. Fewer than `min_samples` survivors yield
    /// `InsufficientData`. Undefined statistics are reported as 0 so every
    /// vector has the same columns.
    pub fn extract(&self, lc: &LightCurve, id: &str) -> Outcome<FeatureVector> {
        let mut pairs: Vec<(f64, f64)> = lc
            .time()
            .iter()
            .zip(lc.flux())
            .filter(|(t, f)| t.is_finite() && f.is_finite())
            .map(|(&t, &f)| (t, f))
            .collect();
        if pairs.len() < self.config.min_samples {
            debug!(
                target_id = id,
                got = pairs.len(),
                needed = self.config.min_samples,
                "too few samples for feature extraction"
            );
            return Outcome::InsufficientData {
                needed: self.config.min_samples,
                got: pairs.len(),
            };
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let flux: Vec<f64> = pairs.into_iter().map(|(_, f)| f).collect();

        let summary = SeriesSummary::new(&flux);
        let values: Vec<f64> = FeatureId::ALL.iter().map(|id| id.compute(&summary)).collect();
        let undefined = values.iter().filter(|v| !v.is_finite()).count();
        if undefined > 0 {
            debug!(target_id = id, undefined, "undefined statistics filled with zero");
        }
        match FeatureVector::new(id, values) {
            Ok(vector) => Outcome::Found(vector),
            Err(err) => {
                warn!(target_id = id, %err, "feature extraction failed");
                Outcome::InsufficientData {
                    needed: FEATURE_COUNT,
                    got: 0,
                }
            }
        }
    }
}

/// Extract features with the default configuration.
pub fn extract(lc: &LightCurve, id: &str) -> Outcome<FeatureVector> {
    FeatureExtractor::default().extract(lc, id)
}
