//! Periodic transit detection.
//!
//! The search is a Box Least Squares periodogram over a linear grid of
//! trial periods; the reported period is the one with maximum power.
//!
//! # Example
//!
//! ```
//! use exotransit::core::LightCurve;
//! use exotransit::detection::{BlsConfig, BoxLeastSquares};
//!
//! let time: Vec<f64> = (0..600).map(|i| i as f64 * 0.02).collect();
//! let flux: Vec<f64> = time
//!     .iter()
//!     .map(|t| if t.rem_euclid(2.0) < 0.1 { 0.99 } else { 1.0 })
//!     .collect();
//! let lc = LightCurve::new(time, flux).unwrap();
//!
//! let bls = BoxLeastSquares::new(BlsConfig::default().with_period_grid(1.0, 5.0, 401));
//! let period = bls.find_period(Some(&lc));
//! assert!((period - 2.0).abs() < 0.05);
//! ```

mod bls;

pub use bls::{
    find_period, BlsConfig, BlsPeriodogram, BlsResult, BoxLeastSquares, NEUTRAL_PERIOD,
};
