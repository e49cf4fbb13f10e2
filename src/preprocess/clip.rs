//! Sample rejection: quality flags, undefined values and sigma clipping.

use crate::core::LightCurve;
use crate::error::{Result, TransitError};
use crate::utils::{median, std_dev};
use serde::{Deserialize, Serialize};

/// Quality bits treated as unusable by default.
///
/// Attitude tweak (1), safe mode (2), coarse point (4), earth point (8),
/// reaction-wheel desaturation (32) and manual exclude (128).
pub const DEFAULT_QUALITY_BITMASK: u32 = 1 | 2 | 4 | 8 | 32 | 128;

/// Configuration for iterative sigma clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmaClipConfig {
    /// Reject values below `median - sigma_lower * std`.
    pub sigma_lower: f64,
    /// Reject values above `median + sigma_upper * std`.
    pub sigma_upper: f64,
    /// Maximum number of clipping passes.
    pub max_iters: usize,
}

impl Default for SigmaClipConfig {
    fn default() -> Self {
        Self {
            sigma_lower: 7.0,
            sigma_upper: 7.0,
            max_iters: 5,
        }
    }
}

impl SigmaClipConfig {
    /// Symmetric clipping at `sigma` standard deviations.
    pub fn symmetric(sigma: f64) -> Self {
        Self {
            sigma_lower: sigma,
            sigma_upper: sigma,
            ..Default::default()
        }
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }
}

/// Result of sigma clipping.
#[derive(Debug, Clone)]
pub struct ClipResult {
    /// True for every value that survived clipping.
    pub keep: Vec<bool>,
    /// Median of the surviving values after the last pass.
    pub center: f64,
    /// Standard deviation of the surviving values after the last pass.
    pub spread: f64,
    /// Number of passes performed.
    pub iterations: usize,
}

impl ClipResult {
    pub fn clipped_count(&self) -> usize {
        self.keep.iter().filter(|k| !**k).count()
    }
}

/// Iteratively reject values far from the median.
///
/// Each pass computes the median and standard deviation of the values
/// still kept and rejects those outside the configured band. Rejected
/// values stay rejected. Stops when a pass rejects nothing, the spread
/// collapses to zero, or `max_iters` passes have run. Non-finite values
/// are always rejected.
pub fn sigma_clip(values: &[f64], config: &SigmaClipConfig) -> ClipResult {
    let mut keep: Vec<bool> = values.iter().map(|v| v.is_finite()).collect();
    let mut center = f64::NAN;
    let mut spread = f64::NAN;
    let mut iterations = 0;

    while iterations < config.max_iters {
        let kept: Vec<f64> = values
            .iter()
            .zip(&keep)
            .filter(|(_, &k)| k)
            .map(|(&v, _)| v)
            .collect();
        if kept.is_empty() {
            break;
        }
        center = median(&kept);
        spread = std_dev(&kept);
        iterations += 1;
        if spread <= 0.0 || !spread.is_finite() {
            break;
        }

        let lower = center - config.sigma_lower * spread;
        let upper = center + config.sigma_upper * spread;
        let mut changed = false;
        for (k, &v) in keep.iter_mut().zip(values) {
            if *k && (v < lower || v > upper) {
                *k = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    ClipResult {
        keep,
        center,
        spread,
        iterations,
    }
}

/// Drop samples whose quality flag intersects `bitmask`.
pub fn apply_quality_mask(lc: &LightCurve, bitmask: u32) -> Result<LightCurve> {
    match lc.quality() {
        Some(quality) => {
            let mask: Vec<bool> = quality.iter().map(|q| q & bitmask == 0).collect();
            lc.select(&mask)
        }
        None => Ok(lc.clone()),
    }
}

/// Drop samples with a NaN or infinite time or flux.
pub fn remove_nans(lc: &LightCurve) -> Result<LightCurve> {
    let mask: Vec<bool> = lc
        .time()
        .iter()
        .zip(lc.flux())
        .map(|(t, f)| t.is_finite() && f.is_finite())
        .collect();
    lc.select(&mask)
}

/// Sort samples by time and drop repeated timestamps (first one wins).
pub fn sort_by_time(lc: &LightCurve) -> LightCurve {
    let time = lc.time();
    let mut order: Vec<usize> = (0..lc.len()).collect();
    order.sort_by(|&a, &b| {
        time[a]
            .partial_cmp(&time[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.dedup_by(|b, a| time[*a] == time[*b]);
    lc.permuted(&order)
}

/// Remove flux outliers by sigma clipping.
pub fn remove_outliers(lc: &LightCurve, config: &SigmaClipConfig) -> Result<LightCurve> {
    if config.sigma_lower <= 0.0 || config.sigma_upper <= 0.0 {
        return Err(TransitError::InvalidParameter(
            "sigma thresholds must be positive".to_string(),
        ));
    }
    let result = sigma_clip(lc.flux(), config);
    lc.select(&result.keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn noisy_flat(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 1.0 + 1e-3 * (((i * 37 + 11) % 17) as f64 / 8.0 - 1.0))
            .collect()
    }

    // ==================== sigma_clip ====================

    #[test]
    fn sigma_clip_rejects_spike() {
        let mut values = noisy_flat(200);
        values[50] = 1.5;
        values[120] = 0.2;
        let result = sigma_clip(&values, &SigmaClipConfig::default());
        assert!(!result.keep[50]);
        assert!(!result.keep[120]);
        assert_eq!(result.clipped_count(), 2);
        assert_relative_eq!(result.center, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn sigma_clip_keeps_clean_data() {
        let values = noisy_flat(200);
        let result = sigma_clip(&values, &SigmaClipConfig::default());
        assert_eq!(result.clipped_count(), 0);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn sigma_clip_constant_series() {
        let result = sigma_clip(&[1.0; 10], &SigmaClipConfig::default());
        assert_eq!(result.clipped_count(), 0);
        assert_relative_eq!(result.spread, 0.0);
    }

    #[test]
    fn sigma_clip_rejects_non_finite() {
        let result = sigma_clip(&[1.0, f64::NAN, 1.0, f64::INFINITY], &SigmaClipConfig::default());
        assert_eq!(result.keep, vec![true, false, true, false]);
    }

    #[test]
    fn sigma_clip_asymmetric_keeps_dips() {
        let mut values = noisy_flat(300);
        values[10] = 0.9;
        values[20] = 1.1;
        let config = SigmaClipConfig {
            sigma_lower: 1e6,
            sigma_upper: 5.0,
            max_iters: 5,
        };
        let result = sigma_clip(&values, &config);
        assert!(result.keep[10]);
        assert!(!result.keep[20]);
    }

    // ==================== sample rejection ====================

    #[test]
    fn quality_mask_drops_flagged_cadences() {
        let lc = LightCurve::builder()
            .time(vec![0.0, 1.0, 2.0, 3.0])
            .flux(vec![1.0; 4])
            .quality(vec![0, 4, 1024, 128])
            .build()
            .unwrap();
        let masked = apply_quality_mask(&lc, DEFAULT_QUALITY_BITMASK).unwrap();
        assert_eq!(masked.time(), &[0.0, 2.0]);
    }

    #[test]
    fn remove_nans_drops_undefined_time_or_flux() {
        let lc = LightCurve::new(
            vec![0.0, f64::NAN, 2.0, 3.0],
            vec![1.0, 1.0, f64::NAN, 1.0],
        )
        .unwrap();
        let cleaned = remove_nans(&lc).unwrap();
        assert_eq!(cleaned.time(), &[0.0, 3.0]);
    }

    #[test]
    fn sort_by_time_orders_and_dedupes() {
        let lc = LightCurve::new(vec![2.0, 0.0, 1.0, 2.0], vec![0.3, 0.1, 0.2, 0.4]).unwrap();
        let sorted = sort_by_time(&lc);
        assert_eq!(sorted.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(sorted.flux(), &[0.1, 0.2, 0.3]);
        assert!(sorted.is_clean());
    }

    #[test]
    fn remove_outliers_validates_sigma() {
        let lc = LightCurve::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert!(remove_outliers(&lc, &SigmaClipConfig::symmetric(0.0)).is_err());
    }
}
