//! Box Least Squares (BLS) transit search.
//!
//! For every trial period the light curve is folded and binned in phase,
//! then boxes of several trial durations are slid across all phases. A box
//! model (flat baseline with a rectangular dip) is compared with a flat
//! model, and the improvement in log-likelihood is the power at that
//! period:
//!
//! ```text
//! depth = mean_out - mean_in
//! power = 0.5 * depth^2 * w_in * w_out / (w_in + w_out)
//! ```
//!
//! where `w_in`/`w_out` are the summed inverse-variance weights inside and
//! outside the box. Only dips (positive depth) score.

use crate::core::LightCurve;
use crate::error::{Result, TransitError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Period returned when no curve is available.
///
/// Callers must read it as "no meaningful period", not as a detection.
pub const NEUTRAL_PERIOD: f64 = 1.0;

/// Configuration for the BLS search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlsConfig {
    /// Shortest trial period, in days.
    pub min_period: f64,
    /// Longest trial period, in days.
    pub max_period: f64,
    /// Number of linearly spaced trial periods.
    pub n_periods: usize,
    /// Trial transit durations, in days.
    pub durations: Vec<f64>,
    /// Phase bins per shortest duration.
    pub oversample: usize,
}

impl Default for BlsConfig {
    fn default() -> Self {
        Self {
            min_period: 0.5,
            max_period: 20.0,
            n_periods: 5000,
            durations: vec![0.05, 0.08, 0.12, 0.16, 0.2, 0.25],
            oversample: 10,
        }
    }
}

impl BlsConfig {
    /// Set the trial period range and resolution.
    pub fn with_period_grid(mut self, min_period: f64, max_period: f64, n_periods: usize) -> Self {
        self.min_period = min_period;
        self.max_period = max_period;
        self.n_periods = n_periods;
        self
    }

    pub fn with_durations(mut self, durations: Vec<f64>) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    /// Linearly spaced trial periods (inclusive of both ends).
    pub fn periods(&self) -> Vec<f64> {
        match self.n_periods {
            0 => Vec::new(),
            1 => vec![self.min_period],
            n => {
                let step = (self.max_period - self.min_period) / (n - 1) as f64;
                (0..n).map(|i| self.min_period + step * i as f64).collect()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_period > 0.0) || !(self.max_period >= self.min_period) {
            return Err(TransitError::InvalidParameter(format!(
                "invalid period range [{}, {}]",
                self.min_period, self.max_period
            )));
        }
        if self.n_periods == 0 {
            return Err(TransitError::InvalidParameter(
                "n_periods must be at least 1".to_string(),
            ));
        }
        if self.durations.is_empty() || self.durations.iter().any(|d| !(*d > 0.0)) {
            return Err(TransitError::InvalidParameter(
                "durations must be non-empty and positive".to_string(),
            ));
        }
        if self.durations.iter().any(|d| *d >= self.min_period) {
            return Err(TransitError::InvalidParameter(
                "every duration must be shorter than min_period".to_string(),
            ));
        }
        if self.oversample == 0 {
            return Err(TransitError::InvalidParameter(
                "oversample must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Best box model found by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlsResult {
    /// Period at maximum power, in days.
    pub period: f64,
    /// Log-likelihood improvement of the box model.
    pub power: f64,
    /// Duration of the best box, in days.
    pub duration: f64,
    /// Fractional depth of the best box.
    pub depth: f64,
    /// Mid-transit time of the best box (same time system as the input).
    pub transit_time: f64,
    /// Number of samples inside the best box.
    pub n_in_transit: usize,
}

/// Power as a function of trial period.
#[derive(Debug, Clone)]
pub struct BlsPeriodogram {
    /// Trial periods.
    pub periods: Vec<f64>,
    /// Power at each trial period.
    pub power: Vec<f64>,
    /// Best model over the whole grid.
    pub best: BlsResult,
}

impl BlsPeriodogram {
    pub fn period_at_max_power(&self) -> f64 {
        self.best.period
    }

    /// Signal detection efficiency: `(max - mean) / std` of the power.
    pub fn sde(&self) -> f64 {
        let n = self.power.len() as f64;
        if n < 2.0 {
            return 0.0;
        }
        let mean = self.power.iter().sum::<f64>() / n;
        let std = (self.power.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n).sqrt();
        if std <= 0.0 {
            0.0
        } else {
            (self.best.power - mean) / std
        }
    }
}

/// Box Least Squares period finder.
#[derive(Debug, Clone, Default)]
pub struct BoxLeastSquares {
    config: BlsConfig,
}

/// Best box at one trial period.
#[derive(Debug, Clone, Copy)]
struct BoxFit {
    power: f64,
    duration: f64,
    depth: f64,
    phase_center: f64,
    n_in: usize,
}

impl BoxLeastSquares {
    pub fn new(config: BlsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlsConfig {
        &self.config
    }

    /// Period at maximum BLS power, or [`NEUTRAL_PERIOD`] when there is no
    /// curve or the search cannot run on it.
    pub fn find_period(&self, lc: Option<&LightCurve>) -> f64 {
        let Some(lc) = lc else {
            return NEUTRAL_PERIOD;
        };
        match self.periodogram(lc) {
            Ok(pg) => pg.period_at_max_power(),
            Err(err) => {
                debug!(%err, "period search skipped");
                NEUTRAL_PERIOD
            }
        }
    }

    /// Compute the BLS periodogram over the configured period grid.
    ///
    /// Deterministic: ties resolve to the shortest period.
    pub fn periodogram(&self, lc: &LightCurve) -> Result<BlsPeriodogram> {
        self.config.validate()?;
        let samples = Samples::from_curve(lc)?;
        let periods = self.config.periods();
        let min_duration = self.config.durations.iter().copied().fold(f64::INFINITY, f64::min);
        let bin_width = min_duration / self.config.oversample as f64;

        let mut power = Vec::with_capacity(periods.len());
        let mut best: Option<(f64, BoxFit)> = None;
        for &period in &periods {
            let fit = self.search_period(&samples, period, bin_width);
            power.push(fit.power);
            if best.map_or(true, |(_, b)| fit.power > b.power) {
                best = Some((period, fit));
            }
        }

        let (period, fit) = best.ok_or(TransitError::EmptyData)?;
        let best = BlsResult {
            period,
            power: fit.power,
            duration: fit.duration,
            depth: fit.depth,
            transit_time: samples.t_ref + fit.phase_center * period,
            n_in_transit: fit.n_in,
        };
        info!(
            target_id = lc.target_id().unwrap_or("?"),
            period = best.period,
            power = best.power,
            depth = best.depth,
            "bls search done"
        );
        Ok(BlsPeriodogram {
            periods,
            power,
            best,
        })
    }

    fn search_period(&self, samples: &Samples, period: f64, bin_width: f64) -> BoxFit {
        let n_bins = ((period / bin_width).ceil() as usize).max(1);
        let bin_phase = 1.0 / n_bins as f64;

        // Doubled prefix sums handle boxes that wrap around phase 1 -> 0.
        let mut w_bins = vec![0.0; n_bins];
        let mut wy_bins = vec![0.0; n_bins];
        let mut n_per_bin = vec![0usize; n_bins];
        for ((&t, &y), &w) in samples.time.iter().zip(&samples.flux).zip(&samples.weight) {
            let phase = ((t - samples.t_ref) / period).rem_euclid(1.0);
            let idx = ((phase * n_bins as f64) as usize).min(n_bins - 1);
            w_bins[idx] += w;
            wy_bins[idx] += w * y;
            n_per_bin[idx] += 1;
        }
        let mut cw = vec![0.0; 2 * n_bins + 1];
        let mut cwy = vec![0.0; 2 * n_bins + 1];
        let mut cn = vec![0usize; 2 * n_bins + 1];
        for k in 0..2 * n_bins {
            cw[k + 1] = cw[k] + w_bins[k % n_bins];
            cwy[k + 1] = cwy[k] + wy_bins[k % n_bins];
            cn[k + 1] = cn[k] + n_per_bin[k % n_bins];
        }

        let total_w = samples.total_weight;
        let total_wy = samples.total_weighted_flux;
        let mut best = BoxFit {
            power: 0.0,
            duration: self.config.durations[0],
            depth: 0.0,
            phase_center: 0.0,
            n_in: 0,
        };

        for &duration in &self.config.durations {
            let width = ((duration / period) * n_bins as f64).round().max(1.0) as usize;
            if width >= n_bins {
                continue;
            }
            for start in 0..n_bins {
                let w_in = cw[start + width] - cw[start];
                let w_out = total_w - w_in;
                if w_in <= 0.0 || w_out <= 0.0 {
                    continue;
                }
                let wy_in = cwy[start + width] - cwy[start];
                let depth = (total_wy - wy_in) / w_out - wy_in / w_in;
                if depth <= 0.0 {
                    continue;
                }
                let power = 0.5 * depth * depth * w_in * w_out / total_w;
                if power > best.power {
                    best = BoxFit {
                        power,
                        duration,
                        depth,
                        phase_center: ((start as f64 + width as f64 / 2.0) * bin_phase)
                            .rem_euclid(1.0),
                        n_in: cn[start + width] - cn[start],
                    };
                }
            }
        }

        best
    }
}

/// Finite samples prepared for the search.
struct Samples {
    time: Vec<f64>,
    /// Flux minus its weighted mean, for numerical stability.
    flux: Vec<f64>,
    weight: Vec<f64>,
    t_ref: f64,
    total_weight: f64,
    total_weighted_flux: f64,
}

impl Samples {
    fn from_curve(lc: &LightCurve) -> Result<Self> {
        let errors = lc.flux_err();
        let use_errors = errors.is_some_and(|e| e.iter().all(|x| x.is_finite() && *x > 0.0));

        let mut time = Vec::with_capacity(lc.len());
        let mut flux = Vec::with_capacity(lc.len());
        let mut weight = Vec::with_capacity(lc.len());
        for i in 0..lc.len() {
            let (t, f) = (lc.time()[i], lc.flux()[i]);
            if !(t.is_finite() && f.is_finite()) {
                continue;
            }
            time.push(t);
            flux.push(f);
            weight.push(match (use_errors, errors) {
                (true, Some(e)) => 1.0 / (e[i] * e[i]),
                _ => 1.0,
            });
        }
        if time.len() < 2 {
            return Err(TransitError::InsufficientData {
                needed: 2,
                got: time.len(),
            });
        }

        let total_weight: f64 = weight.iter().sum();
        let mean = flux.iter().zip(&weight).map(|(f, w)| f * w).sum::<f64>() / total_weight;
        flux.iter_mut().for_each(|f| *f -= mean);
        let total_weighted_flux = flux.iter().zip(&weight).map(|(f, w)| f * w).sum();
        let t_ref = time.iter().copied().fold(f64::INFINITY, f64::min);

        Ok(Self {
            time,
            flux,
            weight,
            t_ref,
            total_weight,
            total_weighted_flux,
        })
    }
}

/// Find the best period with the default search configuration.
pub fn find_period(lc: Option<&LightCurve>) -> f64 {
    BoxLeastSquares::default().find_period(lc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Flat curve with box dips of `depth` lasting `duration` days every `period`.
    fn boxed_curve(n: usize, cadence: f64, period: f64, duration: f64, depth: f64, t0: f64) -> LightCurve {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * cadence).collect();
        let flux: Vec<f64> = time
            .iter()
            .map(|&t| {
                let phase = (t - t0).rem_euclid(period);
                if phase < duration / 2.0 || phase > period - duration / 2.0 {
                    1.0 - depth
                } else {
                    1.0
                }
            })
            .collect();
        LightCurve::new(time, flux).unwrap()
    }

    fn quick_config() -> BlsConfig {
        BlsConfig::default().with_period_grid(1.0, 10.0, 901)
    }

    #[test]
    fn period_grid_is_linear_and_inclusive() {
        let periods = BlsConfig::default().periods();
        assert_eq!(periods.len(), 5000);
        assert_relative_eq!(periods[0], 0.5);
        assert_relative_eq!(periods[4999], 20.0, epsilon = 1e-9);
    }

    #[test]
    fn recovers_injected_period() {
        let lc = boxed_curve(1500, 0.02, 3.7, 0.15, 0.005, 1.3);
        let bls = BoxLeastSquares::new(quick_config());
        let pg = bls.periodogram(&lc).unwrap();
        assert_relative_eq!(pg.best.period, 3.7, epsilon = 0.02);
        assert_relative_eq!(pg.best.depth, 0.005, epsilon = 1e-3);
        assert!(pg.sde() > 3.0);
        assert_eq!(pg.power.len(), 901);

        // Mid-transit time lands on one of the injected transits
        let offset = (pg.best.transit_time - 1.3).rem_euclid(3.7);
        assert!(offset < 0.1 || offset > 3.6, "offset {offset}");
    }

    #[test]
    fn uses_flux_errors_as_weights() {
        let base = boxed_curve(1000, 0.02, 2.5, 0.12, 0.004, 0.4);
        let weighted = LightCurve::builder()
            .time(base.time().to_vec())
            .flux(base.flux().to_vec())
            .flux_err(vec![0.001; 1000])
            .build()
            .unwrap();
        let bls = BoxLeastSquares::new(quick_config());
        let unit = bls.periodogram(&base).unwrap();
        let scaled = bls.periodogram(&weighted).unwrap();
        assert_relative_eq!(unit.best.period, scaled.best.period);
        // Uniform errors of 1e-3 scale power by 1e6
        assert_relative_eq!(scaled.best.power, unit.best.power * 1e6, max_relative = 1e-6);
    }

    #[test]
    fn search_is_deterministic() {
        let lc = boxed_curve(800, 0.03, 4.2, 0.1, 0.01, 0.0);
        let bls = BoxLeastSquares::new(quick_config());
        let a = bls.periodogram(&lc).unwrap();
        let b = bls.periodogram(&lc).unwrap();
        assert_eq!(a.power, b.power);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn missing_curve_gives_neutral_period() {
        assert_relative_eq!(find_period(None), NEUTRAL_PERIOD);
        let tiny = LightCurve::new(vec![0.0], vec![1.0]).unwrap();
        assert_relative_eq!(BoxLeastSquares::default().find_period(Some(&tiny)), NEUTRAL_PERIOD);
    }

    #[test]
    fn flat_curve_has_zero_power() {
        let lc = LightCurve::new((0..200).map(|i| i as f64 * 0.05).collect(), vec![1.0; 200]).unwrap();
        let pg = BoxLeastSquares::new(quick_config()).periodogram(&lc).unwrap();
        assert!(pg.power.iter().all(|&p| p == 0.0));
        assert_relative_eq!(pg.sde(), 0.0);
    }

    #[test]
    fn rejects_invalid_config() {
        let lc = boxed_curve(100, 0.02, 1.0, 0.1, 0.01, 0.0);
        let bad_range = BlsConfig::default().with_period_grid(5.0, 1.0, 10);
        assert!(BoxLeastSquares::new(bad_range).periodogram(&lc).is_err());
        let long_box = BlsConfig::default().with_durations(vec![0.6]);
        assert!(BoxLeastSquares::new(long_box).periodogram(&lc).is_err());
        let no_oversample = BlsConfig::default().with_oversample(0);
        assert!(BoxLeastSquares::new(no_oversample).periodogram(&lc).is_err());
    }
}
