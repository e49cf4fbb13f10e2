//! Nearest-centroid reference classifier.

use super::Classifier;
use crate::core::Label;
use crate::error::{Result, TransitError};

/// Scores a row by its distance to the two class centroids in
/// standardized feature space.
///
/// Probability is `1 / (1 + exp(d_transit - d_none))` with `d` the mean
/// squared z-distance to each centroid. Importance of a column is the
/// distance between the class means in units of the column's spread.
#[derive(Debug, Clone, Default)]
pub struct CentroidClassifier {
    columns: Vec<String>,
    center: Vec<f64>,
    scale: Vec<f64>,
    positive: Vec<f64>,
    negative: Vec<f64>,
    fitted: bool,
}

impl CentroidClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn z(&self, j: usize, value: f64) -> f64 {
        if self.scale[j] > 0.0 {
            (value - self.center[j]) / self.scale[j]
        } else {
            0.0
        }
    }

    fn class_mean(&self, rows: &[Vec<f64>], labels: &[Label], class: Label) -> Vec<f64> {
        let members: Vec<&Vec<f64>> = rows
            .iter()
            .zip(labels)
            .filter(|(_, &l)| l == class)
            .map(|(r, _)| r)
            .collect();
        let n = members.len() as f64;
        (0..self.columns.len())
            .map(|j| members.iter().map(|r| self.z(j, r[j])).sum::<f64>() / n)
            .collect()
    }
}

impl Classifier for CentroidClassifier {
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[Label], columns: &[String]) -> Result<()> {
        if rows.len() != labels.len() {
            return Err(TransitError::DimensionMismatch {
                expected: rows.len(),
                got: labels.len(),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(TransitError::DimensionMismatch {
                expected: columns.len(),
                got: bad.len(),
            });
        }
        let positives = labels.iter().filter(|l| l.is_positive()).count();
        if positives == 0 || positives == labels.len() {
            return Err(TransitError::Classifier(
                "training data must contain both classes".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let width = columns.len();
        self.columns = columns.to_vec();
        self.center = (0..width)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n)
            .collect();
        self.scale = (0..width)
            .map(|j| {
                let c = self.center[j];
                (rows.iter().map(|r| (r[j] - c).powi(2)).sum::<f64>() / n).sqrt()
            })
            .collect();
        self.positive = self.class_mean(rows, labels, Label::Transit);
        self.negative = self.class_mean(rows, labels, Label::NoTransit);
        self.fitted = true;
        Ok(())
    }

    fn predict_probability(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(TransitError::Classifier("model is not fitted".to_string()));
        }
        if row.len() != self.columns.len() {
            return Err(TransitError::DimensionMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        let width = row.len().max(1) as f64;
        let (mut d_pos, mut d_neg) = (0.0, 0.0);
        for (j, &value) in row.iter().enumerate() {
            let z = self.z(j, value);
            d_pos += (z - self.positive[j]).powi(2);
            d_neg += (z - self.negative[j]).powi(2);
        }
        let logit = (d_neg - d_pos) / width;
        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn feature_importance(&self) -> Vec<(String, f64)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), (self.positive[j] - self.negative[j]).abs()))
            .collect()
    }

    fn name(&self) -> &str {
        "NearestCentroid"
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn training() -> (Vec<Vec<f64>>, Vec<Label>, Vec<String>) {
        let rows = vec![
            vec![0.98, 5.0, 1.0],
            vec![0.97, 4.0, 1.0],
            vec![0.985, 6.0, 1.0],
            vec![1.0, 5.0, 1.0],
            vec![0.999, 4.0, 1.0],
            vec![1.001, 6.0, 1.0],
        ];
        let labels = vec![
            Label::Transit,
            Label::Transit,
            Label::Transit,
            Label::NoTransit,
            Label::NoTransit,
            Label::NoTransit,
        ];
        let columns = vec!["depth".to_string(), "noise".to_string(), "constant".to_string()];
        (rows, labels, columns)
    }

    #[test]
    fn separates_classes_on_informative_column() {
        let (rows, labels, columns) = training();
        let mut model = CentroidClassifier::new();
        model.fit(&rows, &labels, &columns).unwrap();
        assert!(model.is_fitted());
        assert!(model.predict_probability(&[0.975, 5.0, 1.0]).unwrap() > 0.5);
        assert!(model.predict_probability(&[1.0, 5.0, 1.0]).unwrap() < 0.5);
        assert_eq!(model.predict(&[0.975, 5.0, 1.0], 0.5).unwrap(), Label::Transit);

        let importance = model.feature_importance();
        assert_eq!(importance[0].0, "depth");
        assert!(importance[0].1 > importance[1].1);
        assert_relative_eq!(importance[1].1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(importance[2].1, 0.0);
    }

    #[test]
    fn rejects_bad_training_data() {
        let (rows, labels, columns) = training();
        let mut model = CentroidClassifier::new();
        assert!(model.fit(&rows, &labels[..3], &columns).is_err());
        assert!(model.fit(&rows[..3], &labels[..3], &columns).is_err());
        assert!(model.fit(&rows, &labels, &columns[..2]).is_err());
        assert!(model.predict_probability(&[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn prediction_checks_width() {
        let (rows, labels, columns) = training();
        let mut model = CentroidClassifier::new();
        model.fit(&rows, &labels, &columns).unwrap();
        assert!(model.predict_probability(&[1.0]).is_err());
    }
}
