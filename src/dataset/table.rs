//! Feature table CSV files.
//!
//! Layout: `target_id,target_label,<feature columns...>`, one row per
//! (possibly augmented) sample.

use crate::core::Label;
use crate::error::{Result, TransitError};
use crate::features::{feature_names, FeatureVector};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::debug;

/// Identifier column.
pub const ID_COLUMN: &str = "target_id";
/// Class label column.
pub const LABEL_COLUMN: &str = "target_label";
/// Columns whose rounded values identify a duplicated row.
pub const SIGNATURE_COLUMNS: [&str; 4] = [
    "flux__mean",
    "flux__standard_deviation",
    "flux__sum_values",
    "flux__variance",
];
const SIGNATURE_DECIMALS: i32 = 8;

/// Feature vector together with its class.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: Label,
}

impl Sample {
    pub fn new(features: FeatureVector, label: Label) -> Self {
        Self { features, label }
    }

    pub fn target_id(&self) -> &str {
        self.features.target_id()
    }
}

/// Write samples as a feature table.
pub fn write_feature_table<W: io::Write>(samples: &[Sample], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header = vec![ID_COLUMN.to_string(), LABEL_COLUMN.to_string()];
    header.extend(feature_names().iter().cloned());
    writer.write_record(&header)?;
    for sample in samples {
        let mut record = Vec::with_capacity(header.len());
        record.push(sample.target_id().to_string());
        record.push(sample.label.to_string());
        record.extend(sample.features.values().iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write samples to a CSV file, replacing it.
pub fn write_feature_table_file(samples: &[Sample], path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_feature_table(samples, io::BufWriter::new(file))
}

/// A loaded feature table: numeric columns only, ids and labels kept apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    columns: Vec<String>,
    ids: Vec<String>,
    labels: Vec<Label>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build from rows aligned with `columns`.
    pub fn new(
        columns: Vec<String>,
        ids: Vec<String>,
        labels: Vec<Label>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if ids.len() != rows.len() || labels.len() != rows.len() {
            return Err(TransitError::DimensionMismatch {
                expected: rows.len(),
                got: ids.len().min(labels.len()),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(TransitError::DimensionMismatch {
                expected: columns.len(),
                got: bad.len(),
            });
        }
        Ok(Self {
            columns,
            ids,
            labels,
            rows,
        })
    }

    /// Table of freshly extracted samples.
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self {
            columns: feature_names().to_vec(),
            ids: samples.iter().map(|s| s.target_id().to_string()).collect(),
            labels: samples.iter().map(|s| s.label).collect(),
            rows: samples.iter().map(|s| s.features.values().to_vec()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric feature column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Row-major feature matrix.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one column, if present.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// `(name, value)` pairs of row `i`.
    pub fn row_pairs(&self, i: usize) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.rows[i].iter().copied())
    }

    /// Drop rows whose signature columns, rounded to 8 decimals, repeat an
    /// earlier row. Missing signature columns are ignored; without any the
    /// table is returned unchanged.
    pub fn dedup_by_signature(&self) -> FeatureTable {
        let idx: Vec<usize> = SIGNATURE_COLUMNS
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| c == name))
            .collect();
        if idx.is_empty() {
            return self.clone();
        }
        let scale = 10f64.powi(SIGNATURE_DECIMALS);
        let mut seen: HashSet<Vec<i64>> = HashSet::new();
        let mut out = FeatureTable {
            columns: self.columns.clone(),
            ..FeatureTable::default()
        };
        for (i, row) in self.rows.iter().enumerate() {
            let key: Vec<i64> = idx.iter().map(|&j| (row[j] * scale).round() as i64).collect();
            if seen.insert(key) {
                out.ids.push(self.ids[i].clone());
                out.labels.push(self.labels[i]);
                out.rows.push(row.clone());
            }
        }
        debug!(before = self.len(), after = out.len(), "duplicate rows dropped");
        out
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

fn parse_label(cell: &str, line: usize) -> Result<Label> {
    let value = cell
        .trim()
        .parse::<f64>()
        .map_err(|_| TransitError::Csv(format!("line {line}: label '{cell}' is not numeric")))?;
    if value != 0.0 && value != 1.0 {
        return Err(TransitError::Csv(format!(
            "line {line}: label must be 0 or 1, got {value}"
        )));
    }
    Label::try_from(value as u8)
}

/// Read a feature table.
///
/// Columns other than the id and label are kept only when every cell is
/// numeric or empty. Empty and non-finite cells become 0.
pub fn read_feature_table<R: io::Read>(reader: R) -> Result<FeatureTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let id_idx = headers.iter().position(|h| h == ID_COLUMN);
    let label_idx = headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or_else(|| TransitError::Csv(format!("missing '{LABEL_COLUMN}' column")))?;

    let candidates: Vec<usize> = (0..headers.len())
        .filter(|&i| Some(i) != id_idx && i != label_idx)
        .collect();
    let mut numeric = vec![true; candidates.len()];
    let mut raw_rows: Vec<Vec<Option<f64>>> = Vec::new();
    let mut ids = Vec::new();
    let mut labels = Vec::new();

    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let line = n + 2;
        let label_cell = record.get(label_idx).unwrap_or("");
        labels.push(parse_label(label_cell, line)?);
        ids.push(match id_idx {
            Some(i) => record.get(i).unwrap_or("").to_string(),
            None => format!("row{}", n),
        });
        let parsed: Vec<Option<f64>> = candidates
            .iter()
            .map(|&i| parse_cell(record.get(i).unwrap_or("")))
            .collect();
        for (flag, cell) in numeric.iter_mut().zip(&parsed) {
            *flag &= cell.is_some();
        }
        raw_rows.push(parsed);
    }

    let keep: Vec<usize> = (0..candidates.len()).filter(|&k| numeric[k]).collect();
    if keep.len() < candidates.len() {
        debug!(dropped = candidates.len() - keep.len(), "non-numeric columns dropped");
    }
    let columns = keep
        .iter()
        .map(|&k| headers[candidates[k]].to_string())
        .collect();
    let rows = raw_rows
        .into_iter()
        .map(|row| {
            keep.iter()
                .map(|&k| row[k].filter(|v| v.is_finite()).unwrap_or(0.0))
                .collect()
        })
        .collect();
    FeatureTable::new(columns, ids, labels, rows)
}

/// Read a feature table from a CSV file.
pub fn read_feature_table_file(path: impl AsRef<Path>) -> Result<FeatureTable> {
    let file = std::fs::File::open(path)?;
    read_feature_table(io::BufReader::new(file))
}
