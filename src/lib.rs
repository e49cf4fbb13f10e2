//! # exotransit
//!
//! Exoplanet transit candidates from stellar light curves.
//!
//! The pipeline cleans raw Kepler/TESS photometry (quality masking,
//! outlier rejection, adaptive binning, detrending), searches for periodic
//! box-shaped dips with Box Least Squares, phase-folds the result for
//! display, and summarizes each curve as a fixed-schema feature vector
//! for a classifier. For training, labelled seed curves are split into
//! train and test before being multiplied by synthetic transit injection
//! and noise/amplitude variants.
//!
//! # Example
//!
//! ```
//! use exotransit::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let time: Vec<f64> = (0..1000).map(|i| i as f64 * 0.02).collect();
//! let flat = LightCurve::new(time, vec![1.0; 1000]).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let injected = inject_synthetic_transit(&flat, 5.0, 3.0, 0.01, &mut rng).unwrap();
//!
//! let period = find_period(Some(&injected.curve));
//! assert!((period - 5.0).abs() < 0.05);
//!
//! let features = extract(&injected.curve, "demo").into_option().unwrap();
//! assert!((features.get(FeatureId::SciTransitDepthMin) - 0.99).abs() < 1e-9);
//! ```

#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod augment;
pub mod classify;
pub mod config;
pub mod core;
pub mod dataset;
pub mod detection;
pub mod error;
pub mod features;
pub mod preprocess;
pub mod source;
pub mod transform;
pub mod utils;

pub use error::{Result, TransitError};

pub mod prelude {
    pub use crate::augment::{
        augment, augment_balanced, augment_signal_variants, inject_synthetic_transit, Augmenter,
        Strategy,
    };
    pub use crate::classify::{AnalysisContext, Classifier, ModelSchema};
    pub use crate::config::PipelineConfig;
    pub use crate::core::{FoldedCurve, Label, LightCurve, Mission, Outcome};
    pub use crate::dataset::{DatasetBuilder, FeatureTable, TrainingDataset};
    pub use crate::detection::{find_period, BoxLeastSquares};
    pub use crate::error::{Result, TransitError};
    pub use crate::features::{extract, FeatureExtractor, FeatureId, FeatureVector};
    pub use crate::preprocess::{clean_and_flatten, Preprocessor, Quality};
    pub use crate::source::{InMemorySource, SignalSource};
    pub use crate::transform::fold;
}
