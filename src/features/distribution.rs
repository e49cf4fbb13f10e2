//! Shape of the flux value distribution, ignoring time order.

use super::basic::{maximum, mean, median, minimum, standard_deviation};

/// Central moments `(m2, m3, m4)` with `n` denominators.
fn central_moments(series: &[f64]) -> (f64, f64, f64) {
    let m = mean(series);
    let n = series.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for x in series {
        let d = x - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Variance indistinguishable from rounding noise around the mean.
fn is_flat(m2: f64, series: &[f64]) -> bool {
    m2 <= (1e-12 * mean(series).abs()).powi(2)
}

/// Bias-corrected sample skewness (adjusted Fisher-Pearson, G1).
///
/// Zero for a constant series, `NaN` below three values.
pub fn skewness(series: &[f64]) -> f64 {
    if series.len() < 3 {
        return f64::NAN;
    }
    let n = series.len() as f64;
    let (m2, m3, _) = central_moments(series);
    if is_flat(m2, series) {
        return 0.0;
    }
    (n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5)
}

/// Bias-corrected sample excess kurtosis (G2); 0 for a normal sample.
///
/// Zero for a constant series, `NaN` below four values.
pub fn kurtosis(series: &[f64]) -> f64 {
    if series.len() < 4 {
        return f64::NAN;
    }
    let n = series.len() as f64;
    let (m2, _, m4) = central_moments(series);
    if is_flat(m2, series) {
        return 0.0;
    }
    (n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * m4 / (m2 * m2) - 3.0 * (n - 1.0))
}

/// Linearly interpolated quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return f64::NAN;
    };
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    if lower + 1 >= sorted.len() {
        return last;
    }
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[lower + 1] - sorted[lower]) * frac
}

/// Linearly interpolated quantile.
pub fn quantile(series: &[f64], q: f64) -> f64 {
    quantile_sorted(&crate::utils::sorted_finite(series), q)
}

/// Fraction of values further than `r` standard deviations from the mean.
pub fn ratio_beyond_r_sigma(series: &[f64], r: f64) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    let m = mean(series);
    let limit = r * standard_deviation(series);
    let beyond = series.iter().filter(|x| (*x - m).abs() > limit).count();
    beyond as f64 / series.len() as f64
}

/// Whether the standard deviation exceeds `r` times the value range.
pub fn large_standard_deviation(series: &[f64], r: f64) -> bool {
    let range = maximum(series) - minimum(series);
    range > 0.0 && standard_deviation(series) > r * range
}

/// Whether `|mean - median| < r * (max - min)`.
pub fn symmetry_looking(series: &[f64], r: f64) -> bool {
    let range = maximum(series) - minimum(series);
    (mean(series) - median(series)).abs() < r * range || range == 0.0
}

/// Whether the variance is larger than the standard deviation (variance > 1).
pub fn variance_larger_than_standard_deviation(series: &[f64]) -> bool {
    let sd = standard_deviation(series);
    sd * sd > sd
}
