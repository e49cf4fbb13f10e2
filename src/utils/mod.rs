//! Numeric utilities shared across pipeline stages.

pub mod ols;
pub mod stats;

pub use ols::{lstsq, solve_from_sums};
pub use stats::{mean, median, median_abs_deviation, median_sorted, sorted_finite, std_dev};
