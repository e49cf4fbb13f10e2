//! LightCurve data structure: a star's brightness sampled over time.

use crate::error::{Result, TransitError};
use crate::utils::median;

/// A brightness time series for one celestial target.
///
/// Raw curves (straight from a [`crate::source::SignalSource`]) may be
/// unsorted and contain NaN values, outliers or flagged cadences. Curves
/// produced by [`crate::preprocess::Preprocessor`] are sorted, strictly
/// increasing in time, finite everywhere, and normalized so the
/// out-of-transit baseline sits near 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Option<Vec<f64>>,
    quality: Option<Vec<u32>>,
    target_id: Option<String>,
}

/// Builder for constructing a LightCurve with optional columns.
#[derive(Debug, Clone, Default)]
pub struct LightCurveBuilder {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Option<Vec<f64>>,
    quality: Option<Vec<u32>>,
    target_id: Option<String>,
}

impl LightCurveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, time: Vec<f64>) -> Self {
        self.time = time;
        self
    }

    pub fn flux(mut self, flux: Vec<f64>) -> Self {
        self.flux = flux;
        self
    }

    /// Per-sample flux uncertainties.
    pub fn flux_err(mut self, flux_err: Vec<f64>) -> Self {
        self.flux_err = Some(flux_err);
        self
    }

    /// Per-sample mission quality flags (0 = good cadence).
    pub fn quality(mut self, quality: Vec<u32>) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn target_id(mut self, id: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<LightCurve> {
        let n = self.time.len();
        if self.flux.len() != n {
            return Err(TransitError::DimensionMismatch {
                expected: n,
                got: self.flux.len(),
            });
        }
        if let Some(err) = &self.flux_err {
            if err.len() != n {
                return Err(TransitError::DimensionMismatch {
                    expected: n,
                    got: err.len(),
                });
            }
        }
        if let Some(quality) = &self.quality {
            if quality.len() != n {
                return Err(TransitError::DimensionMismatch {
                    expected: n,
                    got: quality.len(),
                });
            }
        }
        Ok(LightCurve {
            time: self.time,
            flux: self.flux,
            flux_err: self.flux_err,
            quality: self.quality,
            target_id: self.target_id,
        })
    }
}

impl LightCurve {
    /// Create a light curve from time and flux columns.
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self> {
        LightCurveBuilder::new().time(time).flux(flux).build()
    }

    pub fn builder() -> LightCurveBuilder {
        LightCurveBuilder::new()
    }

    /// Get the number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_err(&self) -> Option<&[f64]> {
        self.flux_err.as_deref()
    }

    pub fn quality(&self) -> Option<&[u32]> {
        self.quality.as_deref()
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    /// Return a copy carrying the given target identifier.
    pub fn with_target_id(mut self, id: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self
    }

    /// Derive a curve on the same time grid with replaced flux values.
    ///
    /// Flux errors and quality flags are carried over unchanged.
    pub fn with_flux(&self, flux: Vec<f64>) -> Result<Self> {
        if flux.len() != self.len() {
            return Err(TransitError::DimensionMismatch {
                expected: self.len(),
                got: flux.len(),
            });
        }
        Ok(Self {
            time: self.time.clone(),
            flux,
            flux_err: self.flux_err.clone(),
            quality: self.quality.clone(),
            target_id: self.target_id.clone(),
        })
    }

    /// Keep only the samples whose mask entry is true.
    pub fn select(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(TransitError::DimensionMismatch {
                expected: self.len(),
                got: mask.len(),
            });
        }
        let pick_f64 = |v: &[f64]| -> Vec<f64> {
            v.iter()
                .zip(mask)
                .filter(|(_, &keep)| keep)
                .map(|(&x, _)| x)
                .collect()
        };
        Ok(Self {
            time: pick_f64(&self.time),
            flux: pick_f64(&self.flux),
            flux_err: self.flux_err.as_deref().map(pick_f64),
            quality: self.quality.as_ref().map(|q| {
                q.iter()
                    .zip(mask)
                    .filter(|(_, &keep)| keep)
                    .map(|(&x, _)| x)
                    .collect()
            }),
            target_id: self.target_id.clone(),
        })
    }

    /// Reorder samples by the given index permutation.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        Self {
            time: order.iter().map(|&i| self.time[i]).collect(),
            flux: order.iter().map(|&i| self.flux[i]).collect(),
            flux_err: self
                .flux_err
                .as_ref()
                .map(|e| order.iter().map(|&i| e[i]).collect()),
            quality: self
                .quality
                .as_ref()
                .map(|q| order.iter().map(|&i| q[i]).collect()),
            target_id: self.target_id.clone(),
        }
    }

    /// Check that time and flux are finite and time is strictly increasing.
    pub fn is_clean(&self) -> bool {
        self.time.iter().all(|t| t.is_finite())
            && self.flux.iter().all(|f| f.is_finite())
            && self.time.windows(2).all(|w| w[1] > w[0])
    }

    /// Time covered by the curve (last minus first timestamp).
    pub fn time_span(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Median spacing between consecutive timestamps.
    ///
    /// Assumes the curve is sorted; returns NaN with fewer than two samples.
    pub fn median_cadence(&self) -> f64 {
        if self.len() < 2 {
            return f64::NAN;
        }
        let diffs: Vec<f64> = self.time.windows(2).map(|w| w[1] - w[0]).collect();
        median(&diffs)
    }

    /// Divide flux (and errors) by the median flux.
    pub fn normalized(&self) -> Result<Self> {
        let finite: Vec<f64> = self.flux.iter().copied().filter(|f| f.is_finite()).collect();
        if finite.is_empty() {
            return Err(TransitError::EmptyData);
        }
        let m = median(&finite);
        if m == 0.0 || !m.is_finite() {
            return Err(TransitError::InvalidParameter(
                "cannot normalize a curve with zero median flux".to_string(),
            ));
        }
        let mut out = self.with_flux(self.flux.iter().map(|f| f / m).collect())?;
        out.flux_err = self
            .flux_err
            .as_ref()
            .map(|e| e.iter().map(|x| x / m.abs()).collect());
        Ok(out)
    }

    pub(crate) fn into_parts(self) -> LightCurveParts {
        LightCurveParts {
            time: self.time,
            flux: self.flux,
            flux_err: self.flux_err,
            quality: self.quality,
            target_id: self.target_id,
        }
    }

    pub(crate) fn from_parts(parts: LightCurveParts) -> Self {
        Self {
            time: parts.time,
            flux: parts.flux,
            flux_err: parts.flux_err,
            quality: parts.quality,
            target_id: parts.target_id,
        }
    }
}

/// Owned columns of a light curve, for stages that rebuild all of them.
#[derive(Debug, Clone, Default)]
pub(crate) struct LightCurveParts {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    pub flux_err: Option<Vec<f64>>,
    pub quality: Option<Vec<u32>>,
    pub target_id: Option<String>,
}
