//! Synthetic training data from real seed light curves.
//!
//! Two composable strategies:
//!
//! * **Injection**: periodic box-shaped transits with random period,
//!   duration, depth and phase, subtracted from the seed flux. Only ever
//!   applied to positive seeds, since it manufactures a transit.
//! * **Variants**: noisy, deep and shallow versions of a seed, applied to
//!   both classes.
//!
//! Augmented curves carry the id `<root>_<kind><n>` where `kind` is one of
//! `inj`, `noisy`, `deep` or `shallow`; [`source_root`] recovers the seed id.
//! All randomness comes from the caller's generator.

mod balance;
mod inject;
mod variants;

pub use balance::{augment_balanced, source_root, AUGMENT_KINDS};
pub use inject::{
    inject_random_transit, inject_synthetic_transit, inject_transit, transit_mask,
    InjectedTransit, InjectionConfig, TransitParams,
};
pub use variants::{augment_signal_variants, scale_deviation, Variant, VariantConfig};

use crate::core::{Label, LightCurve};
use crate::error::{Result, TransitError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which synthesis strategies to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Injection,
    Variants,
    #[default]
    Both,
}

impl Strategy {
    pub fn uses_injection(&self) -> bool {
        matches!(self, Strategy::Injection | Strategy::Both)
    }

    pub fn uses_variants(&self) -> bool {
        matches!(self, Strategy::Variants | Strategy::Both)
    }
}

impl FromStr for Strategy {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "injection" => Ok(Strategy::Injection),
            "variants" => Ok(Strategy::Variants),
            "both" => Ok(Strategy::Both),
            other => Err(TransitError::InvalidParameter(format!(
                "unknown augmentation strategy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Injection => "injection",
            Strategy::Variants => "variants",
            Strategy::Both => "both",
        };
        f.write_str(name)
    }
}

/// Configuration for both synthesis strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub injection: InjectionConfig,
    pub variants: VariantConfig,
}

impl AugmentConfig {
    pub fn with_injection(mut self, injection: InjectionConfig) -> Self {
        self.injection = injection;
        self
    }

    pub fn with_variants(mut self, variants: VariantConfig) -> Self {
        self.variants = variants;
        self
    }
}

/// Multiplies labelled seed curves into labelled synthetic curves.
#[derive(Debug, Clone, Default)]
pub struct Augmenter {
    config: AugmentConfig,
}

impl Augmenter {
    pub fn new(config: AugmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Seeds followed by every derivative produced by `strategy`.
    ///
    /// Derivatives inherit their seed's label. Injection is skipped for
    /// negative seeds.
    pub fn augment<R: Rng + ?Sized>(
        &self,
        base: &[LightCurve],
        labels: &[Label],
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<(Vec<LightCurve>, Vec<Label>)> {
        check_labels(base, labels)?;
        let mut curves = base.to_vec();
        let mut out_labels = labels.to_vec();
        for (i, (seed, &label)) in base.iter().zip(labels).enumerate() {
            let derived = self.expand_seed(seed, &seed_root(seed, i), label, strategy, 0, rng)?;
            out_labels.extend(std::iter::repeat(label).take(derived.len()));
            curves.extend(derived);
        }
        debug!(
            seeds = base.len(),
            total = curves.len(),
            %strategy,
            "augmentation done"
        );
        Ok((curves, out_labels))
    }

    /// Derivatives of one seed for augmentation round `cycle`.
    ///
    /// Order: injected copies (positives only), then noisy, deep and
    /// shallow variants.
    pub(crate) fn expand_seed<R: Rng + ?Sized>(
        &self,
        seed: &LightCurve,
        root: &str,
        label: Label,
        strategy: Strategy,
        cycle: usize,
        rng: &mut R,
    ) -> Result<Vec<LightCurve>> {
        let mut out = Vec::new();
        if strategy.uses_injection() && label.is_positive() {
            let per_seed = self.config.injection.injections_per_seed;
            for k in 0..per_seed {
                let injected = inject_random_transit(seed, &self.config.injection, rng)?;
                let n = cycle * per_seed + k;
                out.push(injected.curve.with_target_id(format!("{root}_inj{n}")));
            }
        }
        if strategy.uses_variants() {
            for (variant, curve) in augment_signal_variants(seed, &self.config.variants, rng)? {
                out.push(curve.with_target_id(format!("{root}_{variant}{cycle}")));
            }
        }
        Ok(out)
    }
}

/// Augment with the default configuration.
pub fn augment<R: Rng + ?Sized>(
    base: &[LightCurve],
    labels: &[Label],
    strategy: Strategy,
    rng: &mut R,
) -> Result<(Vec<LightCurve>, Vec<Label>)> {
    Augmenter::default().augment(base, labels, strategy, rng)
}

pub(crate) fn check_labels(base: &[LightCurve], labels: &[Label]) -> Result<()> {
    if base.len() != labels.len() {
        return Err(TransitError::DimensionMismatch {
            expected: base.len(),
            got: labels.len(),
        });
    }
    Ok(())
}

/// Id of a seed, falling back to its position for anonymous curves.
pub(crate) fn seed_root(seed: &LightCurve, index: usize) -> String {
    seed.target_id()
        .map(str::to_string)
        .unwrap_or_else(|| format!("seed{index}"))
}
