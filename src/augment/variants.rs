//! Deterministic-shape perturbations of a light curve.

use crate::core::LightCurve;
use crate::error::{Result, TransitError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of the three signal variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Standard deviation of the additive Gaussian noise.
    pub noise_sigma: f64,
    /// Scale applied to the deviation from 1.0 for the deep variant.
    pub deep_factor: f64,
    /// Scale applied to the deviation from 1.0 for the shallow variant.
    pub shallow_factor: f64,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            noise_sigma: 0.00018,
            deep_factor: 2.0,
            shallow_factor: 0.4,
        }
    }
}

impl VariantConfig {
    pub fn with_noise_sigma(mut self, sigma: f64) -> Self {
        self.noise_sigma = sigma;
        self
    }

    pub fn with_deep_factor(mut self, factor: f64) -> Self {
        self.deep_factor = factor;
        self
    }

    pub fn with_shallow_factor(mut self, factor: f64) -> Self {
        self.shallow_factor = factor;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.noise_sigma >= 0.0 && self.noise_sigma.is_finite()) {
            return Err(TransitError::InvalidParameter(format!(
                "noise_sigma must be finite and non-negative, got {}",
                self.noise_sigma
            )));
        }
        if !self.deep_factor.is_finite() || !self.shallow_factor.is_finite() {
            return Err(TransitError::NonFinite("variant scale factor".to_string()));
        }
        Ok(())
    }
}

/// A signal variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Additive Gaussian noise: a noisier instrument.
    Noisy,
    /// Deviation from baseline amplified: a deeper transit.
    Deep,
    /// Deviation from baseline attenuated: a marginal transit.
    Shallow,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Noisy, Variant::Deep, Variant::Shallow];

    /// Suffix used in augmented target ids.
    pub fn suffix(&self) -> &'static str {
        match self {
            Variant::Noisy => "noisy",
            Variant::Deep => "deep",
            Variant::Shallow => "shallow",
        }
    }

    /// Apply this variant to `lc`. Timestamps are preserved.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        lc: &LightCurve,
        config: &VariantConfig,
        rng: &mut R,
    ) -> Result<LightCurve> {
        config.validate()?;
        let flux = match self {
            Variant::Noisy => {
                let normal = Normal::new(0.0, config.noise_sigma).map_err(|e| {
                    TransitError::InvalidParameter(format!("noise_sigma: {e}"))
                })?;
                lc.flux().iter().map(|f| f + normal.sample(rng)).collect()
            }
            Variant::Deep => scale_deviation(lc.flux(), config.deep_factor),
            Variant::Shallow => scale_deviation(lc.flux(), config.shallow_factor),
        };
        lc.with_flux(flux)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// `1 + (flux - 1) * factor` for every sample.
pub fn scale_deviation(flux: &[f64], factor: f64) -> Vec<f64> {
    flux.iter().map(|f| 1.0 + (f - 1.0) * factor).collect()
}

/// The noisy, deep and shallow variants of `lc`, in that order.
pub fn augment_signal_variants<R: Rng + ?Sized>(
    lc: &LightCurve,
    config: &VariantConfig,
    rng: &mut R,
) -> Result<Vec<(Variant, LightCurve)>> {
    Variant::ALL
        .iter()
        .map(|v| Ok((*v, v.apply(lc, config, rng)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{mean, std_dev};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dipped() -> LightCurve {
        let time: Vec<f64> = (0..400).map(|i| i as f64 * 0.02).collect();
        let flux = (0..400)
            .map(|i| if (100..110).contains(&i) { 0.99 } else { 1.0 + 1e-5 * (i % 3) as f64 })
            .collect();
        LightCurve::new(time, flux).unwrap()
    }

    #[test]
    fn deep_and_shallow_are_exact_linear_transforms() {
        let lc = dipped();
        let mut rng = StdRng::seed_from_u64(1);
        let variants = augment_signal_variants(&lc, &VariantConfig::default(), &mut rng).unwrap();
        let kinds: Vec<Variant> = variants.iter().map(|(v, _)| *v).collect();
        assert_eq!(kinds, Variant::ALL.to_vec());

        let deep = &variants[1].1;
        let shallow = &variants[2].1;
        for ((f, d), s) in lc.flux().iter().zip(deep.flux()).zip(shallow.flux()) {
            assert_eq!(*d, 1.0 + (f - 1.0) * 2.0);
            assert_eq!(*s, 1.0 + (f - 1.0) * 0.4);
        }
        assert_relative_eq!(deep.flux()[105], 0.98, epsilon = 1e-12);
        assert_relative_eq!(shallow.flux()[105], 0.996, epsilon = 1e-12);
    }

    #[test]
    fn variants_preserve_timestamps() {
        let lc = dipped();
        let mut rng = StdRng::seed_from_u64(2);
        for (_, v) in augment_signal_variants(&lc, &VariantConfig::default(), &mut rng).unwrap() {
            assert_eq!(v.time(), lc.time());
        }
    }

    #[test]
    fn noise_has_configured_spread() {
        let lc = LightCurve::new((0..20_000).map(f64::from).collect(), vec![1.0; 20_000]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let noisy = Variant::Noisy
            .apply(&lc, &VariantConfig::default(), &mut rng)
            .unwrap();
        let residual: Vec<f64> = noisy.flux().iter().map(|f| f - 1.0).collect();
        assert_relative_eq!(mean(&residual), 0.0, epsilon = 1e-5);
        assert_relative_eq!(std_dev(&residual), 0.00018, max_relative = 0.05);
    }

    #[test]
    fn invalid_noise_sigma_is_an_error() {
        let lc = dipped();
        let config = VariantConfig::default().with_noise_sigma(-1.0);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(Variant::Noisy.apply(&lc, &config, &mut rng).is_err());
        assert!(augment_signal_variants(&lc, &config, &mut rng).is_err());

        let config = VariantConfig::default().with_noise_sigma(f64::NAN);
        assert!(Variant::Noisy.apply(&lc, &config, &mut rng).is_err());
        let config = VariantConfig::default().with_deep_factor(f64::INFINITY);
        assert!(Variant::Deep.apply(&lc, &config, &mut rng).is_err());

        let silent = VariantConfig::default().with_noise_sigma(0.0);
        let same = Variant::Noisy.apply(&lc, &silent, &mut rng).unwrap();
        assert_eq!(same.flux(), lc.flux());
    }

    #[test]
    fn suffixes() {
        assert_eq!(Variant::Noisy.to_string(), "noisy");
        assert_eq!(Variant::Deep.suffix(), "deep");
        assert_eq!(Variant::Shallow.suffix(), "shallow");
    }
}
