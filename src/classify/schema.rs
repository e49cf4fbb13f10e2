//! Training-time feature columns and importance-based selection.

use crate::error::Result;
use crate::features::FeatureVector;
use crate::utils::median;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Features whose importance reaches this multiple of the median survive
/// [`select_features`].
pub const IMPORTANCE_MEDIAN_FACTOR: f64 = 1.25;

/// Ordered feature names a model was trained on.
///
/// Persisted as a plain JSON array of strings next to the model artifact,
/// so inference applies exactly the training column subset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSchema {
    columns: Vec<String>,
}

impl ModelSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Reorder `(name, value)` pairs to the schema.
    ///
    /// Schema columns absent from `pairs` are filled with 0; names outside
    /// the schema are ignored.
    pub fn align_pairs<'a, I>(&self, pairs: I) -> Vec<f64>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let available: HashMap<&str, f64> = pairs.into_iter().collect();
        let mut missing = 0usize;
        let row = self
            .columns
            .iter()
            .map(|c| match available.get(c.as_str()) {
                Some(&v) => v,
                None => {
                    missing += 1;
                    0.0
                }
            })
            .collect();
        if missing > 0 {
            debug!(missing, "schema columns filled with zero");
        }
        row
    }

    /// Row for `vector` in schema order.
    pub fn align(&self, vector: &FeatureVector) -> Vec<f64> {
        self.align_pairs(vector.iter())
    }
}

/// Keep features whose importance is at least 1.25 times the median
/// importance, in input order.
pub fn select_features(importance: &[(String, f64)]) -> ModelSchema {
    let values: Vec<f64> = importance.iter().map(|(_, v)| *v).collect();
    let threshold = IMPORTANCE_MEDIAN_FACTOR * median(&values);
    let columns: Vec<String> = importance
        .iter()
        .filter(|(_, v)| *v >= threshold)
        .map(|(name, _)| name.clone())
        .collect();
    debug!(
        candidates = importance.len(),
        kept = columns.len(),
        threshold,
        "features selected"
    );
    ModelSchema::new(columns)
}
