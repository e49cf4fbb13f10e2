//! Non-linearity and irregularity measures.

use super::basic::{maximum, mean, minimum, standard_deviation};
use std::collections::HashSet;

/// Mean of `x[i] * x[i+lag] * x[i+2 lag]`.
pub fn c3(series: &[f64], lag: usize) -> f64 {
    let n = series.len();
    if 2 * lag >= n {
        return 0.0;
    }
    let count = n - 2 * lag;
    let total: f64 = (0..count)
        .map(|i| series[i] * series[i + lag] * series[i + 2 * lag])
        .sum();
    total / count as f64
}

/// Complexity estimate `sqrt(sum(diff^2))`, optionally after z-normalising.
pub fn cid_ce(series: &[f64], normalize: bool) -> f64 {
    let diff_energy = |values: &[f64]| -> f64 {
        values.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum::<f64>().sqrt()
    };
    if !normalize {
        return diff_energy(series);
    }
    let sd = standard_deviation(series);
    if !(sd > 0.0) {
        return 0.0;
    }
    let m = mean(series);
    let z: Vec<f64> = series.iter().map(|x| (x - m) / sd).collect();
    diff_energy(&z)
}

/// Lempel-Ziv complexity after quantising into `bins` equal-width levels.
///
/// The symbol sequence is parsed left to right into the shortest words not
/// seen before; the result is the number of distinct words divided by the
/// length.
pub fn lempel_ziv_complexity(series: &[f64], bins: usize) -> f64 {
    if series.is_empty() || bins == 0 {
        return f64::NAN;
    }
    let lo = minimum(series);
    let width = (maximum(series) - lo) / bins as f64;
    let symbols: Vec<usize> = series
        .iter()
        .map(|x| {
            if width > 0.0 {
                // Upper edges are inclusive, like a left-sided search
                (((x - lo) / width).ceil() as usize).saturating_sub(1).min(bins - 1)
            } else {
                0
            }
        })
        .collect();

    let n = symbols.len();
    let mut words: HashSet<&[usize]> = HashSet::new();
    let (mut start, mut len) = (0, 1);
    while start + len <= n {
        let word = &symbols[start..start + len];
        if words.insert(word) {
            start += len;
            len = 1;
        } else {
            len += 1;
        }
    }
    words.len() as f64 / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn c3_of_constant_and_short_series() {
        assert_relative_eq!(c3(&[2.0; 10], 1), 8.0);
        assert_relative_eq!(c3(&[1.0, 2.0, 3.0], 1), 6.0);
        assert_relative_eq!(c3(&[1.0, 2.0], 1), 0.0);
    }

    #[test]
    fn cid_ce_raw_and_normalized() {
        let series = [0.0, 3.0, 3.0, 7.0];
        assert_relative_eq!(cid_ce(&series, false), 5.0);
        // Scaling the series does not change the normalized value
        let scaled: Vec<f64> = series.iter().map(|x| 10.0 * x + 1.0).collect();
        assert_relative_eq!(cid_ce(&series, true), cid_ce(&scaled, true), epsilon = 1e-12);
        assert_relative_eq!(cid_ce(&[1.0; 4], true), 0.0);
    }

    #[test]
    fn lempel_ziv_counts_new_words() {
        // 0 | 1 | 01 | then 01 repeats and 010 runs past the end
        let series = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        assert_relative_eq!(lempel_ziv_complexity(&series, 2), 3.0 / 6.0);
        assert_relative_eq!(lempel_ziv_complexity(&[5.0; 4], 10), 0.5);
        assert!(lempel_ziv_complexity(&[], 10).is_nan());
    }

    #[test]
    fn irregular_series_is_more_complex() {
        let regular: Vec<f64> = (0..200).map(|i| (i % 2) as f64).collect();
        let irregular: Vec<f64> = (0..200).map(|i| ((i * 7919) % 13) as f64).collect();
        assert!(lempel_ziv_complexity(&irregular, 10) > lempel_ziv_complexity(&regular, 10));
    }
}
