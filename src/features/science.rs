//! Transit-oriented summary statistics of a flattened light curve.

use super::basic::{maximum, minimum, standard_deviation};
use super::distribution::{kurtosis, skewness};
use crate::utils::median_abs_deviation;

/// The seven domain statistics computed directly on the flux.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScienceStats {
    /// Population standard deviation.
    pub std_dev: f64,
    /// Bias-corrected sample skewness; transits skew the flux negative.
    pub skewness: f64,
    /// Bias-corrected excess kurtosis.
    pub kurtosis: f64,
    /// Minimum flux, a proxy for the deepest transit.
    pub transit_depth_min: f64,
    /// Median absolute deviation from the median.
    pub mad: f64,
    /// Peak-to-peak range.
    pub peak_to_peak: f64,
    /// Maximum minus minimum.
    pub amplitude: f64,
}

impl ScienceStats {
    pub fn compute(flux: &[f64]) -> Self {
        let (lo, hi) = (minimum(flux), maximum(flux));
        Self {
            std_dev: standard_deviation(flux),
            skewness: skewness(flux),
            kurtosis: kurtosis(flux),
            transit_depth_min: lo,
            mad: median_abs_deviation(flux),
            peak_to_peak: hi - lo,
            amplitude: hi - lo,
        }
    }
}
