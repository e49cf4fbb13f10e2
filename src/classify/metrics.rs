//! Classification metrics.

use super::{Classifier, ModelSchema};
use crate::core::Label;
use crate::dataset::FeatureTable;
use crate::error::{Result, TransitError};

/// Binary confusion matrix with `Transit` as the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[Label], predicted: &[Label]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(TransitError::DimensionMismatch {
                expected: actual.len(),
                got: predicted.len(),
            });
        }
        let mut cm = Self::default();
        for (a, p) in actual.iter().zip(predicted) {
            match (a.is_positive(), p.is_positive()) {
                (true, true) => cm.true_positive += 1,
                (false, true) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (true, false) => cm.false_negative += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Share of correct predictions, 0 when empty.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_positive + self.true_negative) as f64 / total as f64
    }

    /// Precision, recall and F1 for one class.
    pub fn report(&self, class: Label) -> ClassReport {
        let (tp, fp, fn_) = match class {
            Label::Transit => (self.true_positive, self.false_positive, self.false_negative),
            Label::NoTransit => (self.true_negative, self.false_negative, self.false_positive),
        };
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassReport {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

/// Per-class scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of samples of the class.
    pub support: usize,
}

/// Scores of a classifier over a labelled table.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub transit: ClassReport,
    pub no_transit: ClassReport,
}

/// Score every row of `table` after aligning it to `schema`.
pub fn evaluate<C: Classifier + ?Sized>(
    classifier: &C,
    table: &FeatureTable,
    schema: &ModelSchema,
    threshold: f64,
) -> Result<Evaluation> {
    let predicted = (0..table.len())
        .map(|i| classifier.predict(&schema.align_pairs(table.row_pairs(i)), threshold))
        .collect::<Result<Vec<Label>>>()?;
    let confusion = ConfusionMatrix::from_predictions(table.labels(), &predicted)?;
    Ok(Evaluation {
        confusion,
        accuracy: confusion.accuracy(),
        transit: confusion.report(Label::Transit),
        no_transit: confusion.report(Label::NoTransit),
    })
}
