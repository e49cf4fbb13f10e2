//! Detrending ("flattening") of long-timescale stellar variability.
//!
//! The trend is a Savitzky-Golay style local polynomial: every sample gets
//! the value at its own position of a low-order polynomial fitted by least
//! squares to the surrounding window of samples. Fits are repeated while
//! masking samples whose residual exceeds a sigma threshold, so transit
//! dips do not drag the trend down with them. The flux is then divided
//! by the trend, leaving a baseline near 1.0.

use super::clip::{sigma_clip, SigmaClipConfig};
use crate::core::LightCurve;
use crate::error::{Result, TransitError};
use crate::utils::{mean, median, solve_from_sums};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Configuration for the flattening filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Window length in samples (odd). Wide relative to a transit
    /// (hours), narrow relative to stellar variability (days).
    pub window_length: usize,
    /// Polynomial order of the local fit.
    pub polyorder: usize,
    /// Number of fit-and-mask passes.
    pub niters: usize,
    /// Residual clipping threshold in standard deviations.
    pub sigma: f64,
    /// Gaps longer than this many median cadences split the curve into
    /// independently detrended segments.
    pub break_tolerance: f64,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            window_length: 401,
            polyorder: 2,
            niters: 3,
            sigma: 3.0,
            break_tolerance: 5.0,
        }
    }
}

impl FlattenConfig {
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    pub fn with_polyorder(mut self, polyorder: usize) -> Self {
        self.polyorder = polyorder;
        self
    }

    pub fn with_niters(mut self, niters: usize) -> Self {
        self.niters = niters;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.window_length % 2 == 0 {
            return Err(TransitError::InvalidParameter(format!(
                "window_length must be odd, got {}",
                self.window_length
            )));
        }
        if self.window_length < self.polyorder + 2 {
            return Err(TransitError::InvalidParameter(format!(
                "window_length {} too short for polyorder {}",
                self.window_length, self.polyorder
            )));
        }
        if self.niters == 0 {
            return Err(TransitError::InvalidParameter(
                "niters must be at least 1".to_string(),
            ));
        }
        if !(self.sigma > 0.0) {
            return Err(TransitError::InvalidParameter(
                "sigma must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Divide a light curve by its long-timescale trend.
///
/// The input must be sorted with finite time and flux. Flux errors, when
/// present, are divided by the same trend.
pub fn flatten(lc: &LightCurve, config: &FlattenConfig) -> Result<LightCurve> {
    let trend = estimate_trend(lc, config)?;
    let mut parts = lc.clone().into_parts();
    for (f, t) in parts.flux.iter_mut().zip(&trend) {
        *f /= t;
    }
    if let Some(err) = parts.flux_err.as_mut() {
        for (e, t) in err.iter_mut().zip(&trend) {
            *e /= t.abs();
        }
    }
    Ok(LightCurve::from_parts(parts))
}

/// Estimate the smooth trend underlying the flux.
pub fn estimate_trend(lc: &LightCurve, config: &FlattenConfig) -> Result<Vec<f64>> {
    config.validate()?;
    if lc.time().iter().chain(lc.flux()).any(|v| !v.is_finite()) {
        return Err(TransitError::NonFinite("light curve".to_string()));
    }

    let flux = lc.flux();
    let n = flux.len();
    let segments = split_segments(lc.time(), config.break_tolerance);
    let residual_clip = SigmaClipConfig::symmetric(config.sigma);

    let mut mask = vec![true; n];
    let mut trend = vec![0.0; n];

    for _ in 0..config.niters {
        for segment in &segments {
            let fitted = local_polynomial(
                &flux[segment.clone()],
                &mask[segment.clone()],
                config.window_length,
                config.polyorder,
            );
            trend[segment.clone()].copy_from_slice(&fitted);
        }

        let residuals: Vec<f64> = flux.iter().zip(&trend).map(|(f, t)| f - t).collect();
        let clip = sigma_clip(&residuals, &residual_clip);
        for (m, keep) in mask.iter_mut().zip(&clip.keep) {
            *m = *m && *keep;
        }
    }

    // Guard against a zero trend turning the flux infinite.
    let fallback = median(flux);
    for t in trend.iter_mut() {
        if !t.is_finite() || *t == 0.0 {
            *t = if fallback != 0.0 { fallback } else { 1.0 };
        }
    }

    Ok(trend)
}

/// Split sorted timestamps at gaps longer than `tolerance` median cadences.
fn split_segments(time: &[f64], tolerance: f64) -> Vec<Range<usize>> {
    let n = time.len();
    if n < 2 {
        return vec![0..n];
    }
    let diffs: Vec<f64> = time.windows(2).map(|w| w[1] - w[0]).collect();
    let cadence = median(&diffs);
    if !(cadence > 0.0) || !tolerance.is_finite() {
        return vec![0..n];
    }
    let max_gap = tolerance * cadence;

    let mut segments = Vec::new();
    let mut start = 0;
    for (i, d) in diffs.iter().enumerate() {
        if *d > max_gap {
            segments.push(start..i + 1);
            start = i + 1;
        }
    }
    segments.push(start..n);
    segments
}

/// Local polynomial smoothing restricted to masked-in samples.
///
/// Each output value is the fitted polynomial evaluated at the sample's own
/// position. Near the edges the window is shifted inwards rather than
/// truncated. The window shrinks to the segment length for short segments.
fn local_polynomial(y: &[f64], mask: &[bool], window_length: usize, order: usize) -> Vec<f64> {
    let n = y.len();
    if n == 0 {
        return Vec::new();
    }

    let w = if n >= window_length {
        window_length
    } else if n % 2 == 1 {
        n
    } else {
        n - 1
    };
    if w < order + 2 {
        let kept: Vec<f64> = kept_values(y, mask, 0..n);
        let level = if kept.is_empty() { median(y) } else { median(&kept) };
        return vec![level; n];
    }

    let half = w / 2;
    let scale = half.max(1) as f64;
    let mut out = Vec::with_capacity(n);
    let mut power_sums = vec![0.0; 2 * order + 1];
    let mut moment_sums = vec![0.0; order + 1];

    for i in 0..n {
        let start = i.saturating_sub(half).min(n - w);
        power_sums.iter_mut().for_each(|s| *s = 0.0);
        moment_sums.iter_mut().for_each(|s| *s = 0.0);
        let mut count = 0;

        for j in start..start + w {
            if !mask[j] {
                continue;
            }
            count += 1;
            let u = (j as f64 - i as f64) / scale;
            let mut p = 1.0;
            for (k, s) in power_sums.iter_mut().enumerate() {
                *s += p;
                if k <= order {
                    moment_sums[k] += p * y[j];
                }
                p *= u;
            }
        }

        let value = if count > order {
            solve_from_sums(&power_sums, &moment_sums).map(|c| c[0])
        } else {
            None
        };
        out.push(value.unwrap_or_else(|| {
            let kept = kept_values(y, mask, start..start + w);
            if kept.is_empty() {
                y[i]
            } else {
                mean(&kept)
            }
        }));
    }

    out
}

fn kept_values(y: &[f64], mask: &[bool], range: Range<usize>) -> Vec<f64> {
    range.filter(|&j| mask[j]).map(|j| y[j]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(time: Vec<f64>, flux: Vec<f64>) -> LightCurve {
        LightCurve::new(time, flux).unwrap()
    }

    #[test]
    fn flatten_removes_slow_trend() {
        let n = 2000;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.02).collect();
        // Slow sinusoidal variability with a period of 200 days around 1000 e/s
        let flux: Vec<f64> = time
            .iter()
            .map(|t| 1000.0 * (1.0 + 0.01 * (2.0 * std::f64::consts::PI * t / 200.0).sin()))
            .collect();
        let flat = flatten(&curve(time, flux), &FlattenConfig::default()).unwrap();
        for f in flat.flux() {
            assert_relative_eq!(*f, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn flatten_preserves_transit_dip() {
        let n = 1500;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.02).collect();
        let mut flux: Vec<f64> = time.iter().map(|t| 1.0 + 0.001 * t).collect();
        for i in 700..706 {
            flux[i] -= 0.01;
        }
        let flat = flatten(&curve(time, flux), &FlattenConfig::default()).unwrap();
        for i in 700..706 {
            assert_relative_eq!(flat.flux()[i], 1.0 - 0.01 / (1.0 + 0.001 * i as f64 * 0.02), epsilon = 1e-6);
        }
        assert_relative_eq!(flat.flux()[100], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn flatten_constant_curve_is_unity() {
        let time: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let flat = flatten(&curve(time, vec![42.0; 50]), &FlattenConfig::default()).unwrap();
        for f in flat.flux() {
            assert_relative_eq!(*f, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn flatten_scales_errors_and_keeps_metadata() {
        let lc = LightCurve::builder()
            .time((0..20).map(|i| i as f64).collect())
            .flux(vec![200.0; 20])
            .flux_err(vec![2.0; 20])
            .target_id("Kepler-10")
            .build()
            .unwrap();
        let flat = flatten(&lc, &FlattenConfig::default()).unwrap();
        assert_relative_eq!(flat.flux_err().unwrap()[3], 0.01, epsilon = 1e-12);
        assert_eq!(flat.target_id(), Some("Kepler-10"));
    }

    #[test]
    fn segments_split_on_gaps() {
        let time = vec![0.0, 1.0, 2.0, 3.0, 20.0, 21.0, 22.0];
        let segments = split_segments(&time, 5.0);
        assert_eq!(segments, vec![0..4, 4..7]);
        assert_eq!(split_segments(&[1.0], 5.0), vec![0..1]);
    }

    #[test]
    fn segments_detrended_independently() {
        // Two flat segments at different levels separated by a gap
        let mut time: Vec<f64> = (0..100).map(|i| i as f64 * 0.02).collect();
        time.extend((0..100).map(|i| 10.0 + i as f64 * 0.02));
        let mut flux = vec![100.0; 100];
        flux.extend(vec![200.0; 100]);
        let flat = flatten(&curve(time, flux), &FlattenConfig::default()).unwrap();
        for f in flat.flux() {
            assert_relative_eq!(*f, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn config_validation() {
        let lc = curve(vec![0.0, 1.0, 2.0], vec![1.0; 3]);
        let even = FlattenConfig::default().with_window_length(400);
        assert!(flatten(&lc, &even).is_err());
        let short = FlattenConfig::default().with_window_length(3);
        assert!(flatten(&lc, &short).is_err());
        let no_iters = FlattenConfig::default().with_niters(0);
        assert!(flatten(&lc, &no_iters).is_err());
    }

    #[test]
    fn rejects_non_finite_input() {
        let lc = curve(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 1.0]);
        assert!(flatten(&lc, &FlattenConfig::default()).is_err());
    }
}
