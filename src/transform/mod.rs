//! Transformations of a cleaned light curve.
//!
//! # Example
//!
//! ```
//! use exotransit::core::LightCurve;
//! use exotransit::transform::fold;
//!
//! let period = 2.0;
//! let lc = LightCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();
//! let folded = fold(&lc, period, Some(0.0)).unwrap();
//! assert_eq!(folded.phase(), &[0.0, 0.0, 0.5]);
//! ```

mod fold;

pub use fold::{fold, phases};
