//! Light-curve cleaning: outlier rejection, adaptive binning and flattening.
//!
//! # Example
//!
//! ```
//! use exotransit::core::{LightCurve, Outcome};
//! use exotransit::preprocess::{Preprocessor, Quality};
//!
//! let time: Vec<f64> = (0..500).map(|i| i as f64 * 0.02).collect();
//! let flux: Vec<f64> = time.iter().map(|t| 1200.0 + 0.5 * t).collect();
//! let raw = LightCurve::new(time, flux).unwrap();
//!
//! let cleaned = Preprocessor::default().clean(Some(&raw), Quality::Auto);
//! match cleaned {
//!     Outcome::Found(lc) => assert!(lc.is_clean()),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod bin;
mod clip;
mod flatten;

pub use bin::bin;
pub use clip::{
    apply_quality_mask, remove_nans, remove_outliers, sigma_clip, sort_by_time, ClipResult,
    SigmaClipConfig, DEFAULT_QUALITY_BITMASK,
};
pub use flatten::{estimate_trend, flatten, FlattenConfig};

use crate::core::{LightCurve, Outcome};
use crate::error::{Result, TransitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Compute-versus-fidelity setting for binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Bin only when the raw curve is large.
    #[default]
    Auto,
    /// Always bin at the fine width.
    Fast,
    /// Always bin at the coarse width.
    Ultra,
}

impl FromStr for Quality {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Quality::Auto),
            "fast" => Ok(Quality::Fast),
            "ultra" => Ok(Quality::Ultra),
            other => Err(TransitError::InvalidParameter(format!(
                "unknown quality '{other}', expected auto, fast or ultra"
            ))),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Auto => "auto",
            Quality::Fast => "fast",
            Quality::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

/// Configuration for the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Quality bits that mark a cadence unusable.
    pub quality_bitmask: u32,
    /// Outlier rejection around the median flux.
    pub clip: SigmaClipConfig,
    /// Raw sample count above which `Quality::Auto` bins.
    pub auto_bin_threshold: usize,
    /// Bin width for `Fast` (and `Auto` above the threshold), in days.
    pub fast_bin_width: f64,
    /// Bin width for `Ultra`, in days.
    pub ultra_bin_width: f64,
    /// Detrending filter.
    pub flatten: FlattenConfig,
    /// Fewest samples a usable curve may have.
    pub min_samples: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            quality_bitmask: DEFAULT_QUALITY_BITMASK,
            clip: SigmaClipConfig::default(),
            auto_bin_threshold: 100_000,
            fast_bin_width: 0.01,
            ultra_bin_width: 0.05,
            flatten: FlattenConfig::default(),
            min_samples: 10,
        }
    }
}

impl PreprocessConfig {
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.clip = SigmaClipConfig {
            sigma_lower: sigma,
            sigma_upper: sigma,
            ..self.clip
        };
        self
    }

    pub fn with_quality_bitmask(mut self, bitmask: u32) -> Self {
        self.quality_bitmask = bitmask;
        self
    }

    pub fn with_auto_bin_threshold(mut self, threshold: usize) -> Self {
        self.auto_bin_threshold = threshold;
        self
    }

    pub fn with_flatten(mut self, flatten: FlattenConfig) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Bin width to apply for a raw curve of `raw_len` samples, if any.
    pub fn bin_width(&self, quality: Quality, raw_len: usize) -> Option<f64> {
        match quality {
            Quality::Auto if raw_len > self.auto_bin_threshold => Some(self.fast_bin_width),
            Quality::Auto => None,
            Quality::Fast => Some(self.fast_bin_width),
            Quality::Ultra => Some(self.ultra_bin_width),
        }
    }
}

/// Turns raw archive light curves into normalized, detrended curves.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Clean a raw light curve.
    ///
    /// `None` input (acquisition failed upstream) yields `NotFound`. Too few
    /// surviving samples yield `InsufficientData`. Invalid configuration is
    /// logged and also reported as `InsufficientData`, so a batch caller
    /// can skip the target and carry on.
    pub fn clean(&self, raw: Option<&LightCurve>, quality: Quality) -> Outcome<LightCurve> {
        let Some(raw) = raw else {
            return Outcome::NotFound;
        };
        match self.try_clean(raw, quality) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(target_id = raw.target_id().unwrap_or("?"), %err, "preprocessing failed");
                Outcome::InsufficientData {
                    needed: self.config.min_samples,
                    got: 0,
                }
            }
        }
    }

    /// Clean a raw light curve, surfacing configuration errors.
    ///
    /// Steps: quality mask, NaN removal, time sort, sigma clipping,
    /// optional binning, flattening.
    pub fn try_clean(&self, raw: &LightCurve, quality: Quality) -> Result<Outcome<LightCurve>> {
        let config = &self.config;
        let target = raw.target_id().unwrap_or("?");
        let raw_len = raw.len();

        let lc = apply_quality_mask(raw, config.quality_bitmask)?;
        let lc = sort_by_time(&remove_nans(&lc)?);
        let before_clip = lc.len();
        let lc = remove_outliers(&lc, &config.clip)?;
        debug!(
            target_id = target,
            raw = raw_len,
            finite = before_clip,
            kept = lc.len(),
            "outlier removal done"
        );

        let lc = match config.bin_width(quality, raw_len) {
            Some(width) => {
                let binned = bin(&lc, width)?;
                info!(
                    target_id = target,
                    points = raw_len,
                    width,
                    bins = binned.len(),
                    "binning applied"
                );
                binned
            }
            None => {
                debug!(target_id = target, points = raw_len, "binning skipped");
                lc
            }
        };

        if lc.len() < config.min_samples {
            warn!(
                target_id = target,
                got = lc.len(),
                needed = config.min_samples,
                "too few samples after cleaning"
            );
            return Ok(Outcome::InsufficientData {
                needed: config.min_samples,
                got: lc.len(),
            });
        }

        let flat = flatten(&lc, &config.flatten)?;
        let flat = remove_nans(&flat)?;
        if flat.len() < config.min_samples {
            return Ok(Outcome::InsufficientData {
                needed: config.min_samples,
                got: flat.len(),
            });
        }
        Ok(Outcome::Found(flat))
    }
}

/// Clean a raw curve with the default configuration.
pub fn clean_and_flatten(raw: Option<&LightCurve>, quality: Quality) -> Outcome<LightCurve> {
    Preprocessor::default().clean(raw, quality)
}
