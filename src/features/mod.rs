//! Light-curve feature extraction.
//!
//! A fixed catalog of generic time-series statistics, named the way tsfresh
//! names them, plus seven transit-oriented statistics. Every extracted
//! [`FeatureVector`] carries the same columns in the same order.
//!
//! # Example
//!
//! ```
//! use exotransit::core::LightCurve;
//! use exotransit::features::{FeatureExtractor, FeatureId, FEATURE_COUNT};
//!
//! let time: Vec<f64> = (0..200).map(|i| i as f64 * 0.02).collect();
//! let flux: Vec<f64> = (0..200).map(|i| if i % 50 < 3 { 0.99 } else { 1.0 }).collect();
//! let lc = LightCurve::new(time, flux).unwrap();
//!
//! let vector = FeatureExtractor::default().extract(&lc, "KIC 1").into_option().unwrap();
//! assert_eq!(vector.values().len(), FEATURE_COUNT);
//! assert_eq!(vector.get(FeatureId::SciTransitDepthMin), 0.99);
//! ```
//!
//! The individual statistics are plain functions over `&[f64]`:
//!
//! ```
//! use exotransit::features::{basic, counting, distribution};
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(basic::mean(&series), 3.0);
//! assert_eq!(distribution::skewness(&series), 0.0);
//! assert_eq!(counting::number_peaks(&series, 1), 0);
//! ```

pub mod autocorrelation;
pub mod basic;
mod catalog;
pub mod change;
pub mod complexity;
pub mod counting;
pub mod distribution;
pub mod entropy;
mod extract;
pub mod science;
pub mod spectral;
pub mod trend;

pub use autocorrelation::Aggregate;
pub use catalog::{feature_names, FeatureId, FeatureVector, FEATURE_COUNT, FLUX_PREFIX};
pub use extract::{extract, FeatureConfig, FeatureExtractor};
pub use science::ScienceStats;
pub use spectral::{SpectralMoment, Spectrum};
pub use trend::{LinearTrend, TrendAttr};
