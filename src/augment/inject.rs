//! Synthetic transit injection.

use crate::core::LightCurve;
use crate::error::{Result, TransitError};
use crate::transform::phases;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

const HOURS_PER_DAY: f64 = 24.0;

/// Ranges for randomly drawn transit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Orbital period range, in days.
    pub period_range: Range<f64>,
    /// Transit duration range, in hours.
    pub duration_hours_range: Range<f64>,
    /// Fractional depth range.
    pub depth_range: Range<f64>,
    /// Injected copies produced per positive seed.
    pub injections_per_seed: usize,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            period_range: 1.2..18.0,
            duration_hours_range: 2.0..5.0,
            depth_range: 0.002..0.015,
            injections_per_seed: 2,
        }
    }
}

impl InjectionConfig {
    pub fn with_period_range(mut self, range: Range<f64>) -> Self {
        self.period_range = range;
        self
    }

    pub fn with_duration_hours_range(mut self, range: Range<f64>) -> Self {
        self.duration_hours_range = range;
        self
    }

    pub fn with_depth_range(mut self, range: Range<f64>) -> Self {
        self.depth_range = range;
        self
    }

    pub fn with_injections_per_seed(mut self, n: usize) -> Self {
        self.injections_per_seed = n;
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("period_range", &self.period_range),
            ("duration_hours_range", &self.duration_hours_range),
            ("depth_range", &self.depth_range),
        ] {
            if !(range.start > 0.0 && range.start < range.end && range.end.is_finite()) {
                return Err(TransitError::InvalidParameter(format!(
                    "{name} must be a non-empty positive range, got {range:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Parameters of a periodic box-shaped transit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitParams {
    /// Orbital period, in days.
    pub period: f64,
    /// Transit duration, in hours.
    pub duration_hours: f64,
    /// Fractional flux decrease during transit.
    pub depth: f64,
    /// Time of a mid-transit, in the curve's time system.
    pub epoch: f64,
}

impl TransitParams {
    /// Draw period, duration, depth and a phase offset in `[0, period)`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, config: &InjectionConfig) -> Result<Self> {
        config.validate()?;
        let period = rng.gen_range(config.period_range.clone());
        let duration_hours = rng.gen_range(config.duration_hours_range.clone());
        let depth = rng.gen_range(config.depth_range.clone());
        let epoch = rng.gen_range(0.0..period);
        Ok(Self {
            period,
            duration_hours,
            depth,
            epoch,
        })
    }

    /// Transit duration as a fraction of the period.
    pub fn duration_phase(&self) -> f64 {
        self.duration_hours / HOURS_PER_DAY / self.period
    }

    fn validate(&self) -> Result<()> {
        if !(self.period > 0.0 && self.period.is_finite()) {
            return Err(TransitError::InvalidParameter(format!(
                "period must be positive, got {}",
                self.period
            )));
        }
        if !(self.duration_hours > 0.0 && self.duration_hours / HOURS_PER_DAY < self.period) {
            return Err(TransitError::InvalidParameter(format!(
                "duration {}h must be positive and shorter than the period",
                self.duration_hours
            )));
        }
        if !self.depth.is_finite() || !self.epoch.is_finite() {
            return Err(TransitError::NonFinite("transit depth or epoch".to_string()));
        }
        Ok(())
    }
}

/// A light curve with a transit injected, and the parameters used.
#[derive(Debug, Clone)]
pub struct InjectedTransit {
    pub curve: LightCurve,
    pub params: TransitParams,
}

/// True for every sample whose phase lies inside the transit window.
///
/// The window is centred on the epoch: `phase < half` or `phase > 1 - half`
/// with `half` half the duration in phase units.
pub fn transit_mask(time: &[f64], params: &TransitParams) -> Vec<bool> {
    let half = params.duration_phase() / 2.0;
    phases(time, params.period, params.epoch)
        .into_iter()
        .map(|p| p < half || p > 1.0 - half)
        .collect()
}

/// Subtract `params.depth` from every in-transit sample.
///
/// Out-of-transit samples, timestamps, errors and flags are untouched.
pub fn inject_transit(lc: &LightCurve, params: &TransitParams) -> Result<LightCurve> {
    params.validate()?;
    let mask = transit_mask(lc.time(), params);
    let flux = lc
        .flux()
        .iter()
        .zip(&mask)
        .map(|(&f, &inside)| if inside { f - params.depth } else { f })
        .collect();
    lc.with_flux(flux)
}

/// Inject a transit of fixed shape at a random phase offset.
pub fn inject_synthetic_transit<R: Rng + ?Sized>(
    lc: &LightCurve,
    period: f64,
    duration_hours: f64,
    depth: f64,
    rng: &mut R,
) -> Result<InjectedTransit> {
    if !(period > 0.0 && period.is_finite()) {
        return Err(TransitError::InvalidParameter(format!(
            "period must be positive, got {period}"
        )));
    }
    let params = TransitParams {
        period,
        duration_hours,
        depth,
        epoch: rng.gen_range(0.0..period),
    };
    let curve = inject_transit(lc, &params)?;
    Ok(InjectedTransit { curve, params })
}

/// Inject a transit with every parameter drawn from `config`.
pub fn inject_random_transit<R: Rng + ?Sized>(
    lc: &LightCurve,
    config: &InjectionConfig,
    rng: &mut R,
) -> Result<InjectedTransit> {
    let params = TransitParams::sample(rng, config)?;
    let curve = inject_transit(lc, &params)?;
    Ok(InjectedTransit { curve, params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat(n: usize, cadence: f64) -> LightCurve {
        LightCurve::new((0..n).map(|i| i as f64 * cadence).collect(), vec![1.0; n]).unwrap()
    }

    #[test]
    fn mask_is_centred_on_epoch() {
        let params = TransitParams {
            period: 2.0,
            duration_hours: 4.8,
            depth: 0.01,
            epoch: 1.0,
        };
        // 0.2 days wide: [0.9, 1.1] around each epoch
        let mask = transit_mask(&[0.85, 0.95, 1.0, 1.05, 1.15, 2.95, 3.05, 4.0], &params);
        assert_eq!(mask, vec![false, true, true, true, false, true, true, false]);
    }

    #[test]
    fn injection_subtracts_depth_inside_window_only() {
        let lc = flat(1000, 0.02);
        let mut rng = StdRng::seed_from_u64(7);
        let injected = inject_synthetic_transit(&lc, 5.0, 3.0, 0.01, &mut rng).unwrap();
        let mask = transit_mask(lc.time(), &injected.params);
        assert!(mask.iter().any(|&m| m));
        for ((before, after), inside) in lc.flux().iter().zip(injected.curve.flux()).zip(&mask) {
            if *inside {
                assert_eq!(*after, before - 0.01);
            } else {
                assert_eq!(after, before);
            }
        }
        assert_eq!(injected.curve.time(), lc.time());
    }

    #[test]
    fn sampled_params_respect_ranges() {
        let config = InjectionConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = TransitParams::sample(&mut rng, &config).unwrap();
            assert!(p.period >= 1.2 && p.period < 18.0);
            assert!(p.duration_hours >= 2.0 && p.duration_hours < 5.0);
            assert!(p.depth >= 0.002 && p.depth < 0.015);
            assert!(p.epoch >= 0.0 && p.epoch < p.period);
        }
    }

    #[test]
    fn seeded_injection_is_reproducible() {
        let lc = flat(500, 0.02);
        let config = InjectionConfig::default();
        let a = inject_random_transit(&lc, &config, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = inject_random_transit(&lc, &config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.curve, b.curve);
    }

    #[test]
    fn duration_phase_converts_hours() {
        let p = TransitParams {
            period: 5.0,
            duration_hours: 3.0,
            depth: 0.01,
            epoch: 0.0,
        };
        assert_relative_eq!(p.duration_phase(), 0.025);
    }

    #[test]
    fn rejects_invalid_params() {
        let lc = flat(10, 0.1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(inject_synthetic_transit(&lc, 0.0, 3.0, 0.01, &mut rng).is_err());
        // A 48 hour transit does not fit in a 1 day orbit
        assert!(inject_synthetic_transit(&lc, 1.0, 48.0, 0.01, &mut rng).is_err());
        let bad = InjectionConfig::default().with_depth_range(0.01..0.001);
        assert!(TransitParams::sample(&mut rng, &bad).is_err());
    }
}
