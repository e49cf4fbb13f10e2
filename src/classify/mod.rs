//! Classifier collaboration: scoring feature vectors, persisting the
//! training-time column schema, evaluation, and the analysis context that
//! ties the pipeline together for single-target requests.

mod centroid;
mod context;
mod metrics;
mod schema;

pub use centroid::CentroidClassifier;
pub use context::{AnalysisContext, AnalysisReport, ContextConfig, ContextStatus, NEUTRAL_SCORE};
pub use metrics::{evaluate, ClassReport, ConfusionMatrix, Evaluation};
pub use schema::{select_features, ModelSchema, IMPORTANCE_MEDIAN_FACTOR};

use crate::core::Label;
use crate::error::Result;

/// Probability at or above which a sample is called a transit.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Binary transit classifier.
///
/// Rows are feature values in the column order given to [`Classifier::fit`].
/// This trait is object-safe and can be used with `Box<dyn Classifier>`.
pub trait Classifier {
    /// Train on a row-major matrix with one label per row.
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[Label], columns: &[String]) -> Result<()>;

    /// Probability in `[0, 1]` that `row` shows a transit.
    fn predict_probability(&self, row: &[f64]) -> Result<f64>;

    /// Importance of each training column, in column order.
    fn feature_importance(&self) -> Vec<(String, f64)>;

    /// Get the model name.
    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool;

    /// Hard decision at `threshold`.
    fn predict(&self, row: &[f64], threshold: f64) -> Result<Label> {
        let p = self.predict_probability(row)?;
        Ok(if p >= threshold {
            Label::Transit
        } else {
            Label::NoTransit
        })
    }
}

/// Type alias for boxed classifier trait objects.
pub type BoxedClassifier = Box<dyn Classifier + Send + Sync>;
