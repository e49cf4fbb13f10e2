//! Counts, runs and positions of notable values.
//!
//! Locations are relative positions in `[0, 1]` (index divided by length)
//! so they stay comparable across curves of different lengths.

use super::basic::{maximum, mean, minimum};

pub fn count_above_mean(series: &[f64]) -> usize {
    let m = mean(series);
    series.iter().filter(|&&x| x > m).count()
}

pub fn count_below_mean(series: &[f64]) -> usize {
    let m = mean(series);
    series.iter().filter(|&&x| x < m).count()
}

/// Length of the longest run of consecutive values satisfying `pred`.
fn longest_run(series: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &x in series {
        if pred(x) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

pub fn longest_strike_above_mean(series: &[f64]) -> usize {
    let m = mean(series);
    longest_run(series, |x| x > m)
}

/// Longest run below the mean; for a flattened light curve this tracks
/// the longest dip.
pub fn longest_strike_below_mean(series: &[f64]) -> usize {
    let m = mean(series);
    longest_run(series, |x| x < m)
}

/// Number of peaks of support `n`: values larger than the `n` neighbours
/// on each side.
pub fn number_peaks(series: &[f64], n: usize) -> usize {
    if n == 0 || series.len() < 2 * n + 1 {
        return 0;
    }
    (n..series.len() - n)
        .filter(|&i| {
            let x = series[i];
            (1..=n).all(|k| x > series[i - k] && x > series[i + k])
        })
        .count()
}

/// Number of times the series crosses the level `m`.
pub fn number_crossing_m(series: &[f64], m: f64) -> usize {
    series
        .windows(2)
        .filter(|w| (w[0] > m) != (w[1] > m))
        .count()
}

fn relative_position(index: Option<usize>, len: usize) -> f64 {
    match index {
        Some(i) if len > 0 => i as f64 / len as f64,
        _ => f64::NAN,
    }
}

pub fn first_location_of_maximum(series: &[f64]) -> f64 {
    let max = maximum(series);
    relative_position(series.iter().position(|&x| x == max), series.len())
}

pub fn last_location_of_maximum(series: &[f64]) -> f64 {
    let max = maximum(series);
    let last = series.iter().rposition(|&x| x == max);
    relative_position(last.map(|i| i + 1), series.len())
}

pub fn first_location_of_minimum(series: &[f64]) -> f64 {
    let min = minimum(series);
    relative_position(series.iter().position(|&x| x == min), series.len())
}

pub fn last_location_of_minimum(series: &[f64]) -> f64 {
    let min = minimum(series);
    let last = series.iter().rposition(|&x| x == min);
    relative_position(last.map(|i| i + 1), series.len())
}

/// Whether any value occurs more than once.
pub fn has_duplicate(series: &[f64]) -> bool {
    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| w[0] == w[1])
}

pub fn has_duplicate_max(series: &[f64]) -> bool {
    let max = maximum(series);
    series.iter().filter(|&&x| x == max).count() > 1
}

pub fn has_duplicate_min(series: &[f64]) -> bool {
    let min = minimum(series);
    series.iter().filter(|&&x| x == min).count() > 1
}

/// Relative index at which `q` of the total absolute mass has accumulated.
pub fn index_mass_quantile(series: &[f64], q: f64) -> f64 {
    let total: f64 = series.iter().map(|x| x.abs()).sum();
    if total == 0.0 {
        return f64::NAN;
    }
    let mut cumulative = 0.0;
    for (i, x) in series.iter().enumerate() {
        cumulative += x.abs();
        if cumulative / total >= q {
            return (i + 1) as f64 / series.len() as f64;
        }
    }
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_relative_counts() {
        let series = [1.0, 2.0, 3.0, 4.0, 10.0];
        // Mean is 4.0; the sample equal to it counts on neither side
        assert_eq!(count_above_mean(&series), 1);
        assert_eq!(count_below_mean(&series), 3);
    }

    #[test]
    fn strikes() {
        let series = [1.0, 1.0, 0.9, 0.9, 0.9, 1.0, 1.1, 1.1];
        assert_eq!(longest_strike_below_mean(&series), 3);
        assert_eq!(longest_strike_above_mean(&series), 3);
    }

    #[test]
    fn peaks_and_crossings() {
        let series = [0.0, 3.0, 0.0, 1.0, 0.0, 5.0, 4.0, 0.0];
        assert_eq!(number_peaks(&series, 1), 3);
        assert_eq!(number_peaks(&series, 2), 1);
        assert_eq!(number_peaks(&series, 10), 0);
        assert_eq!(number_crossing_m(&[0.0, 2.0, 0.0, 2.0], 1.0), 3);
    }

    #[test]
    fn locations() {
        let series = [2.0, 5.0, 1.0, 5.0, 1.0];
        assert_relative_eq!(first_location_of_maximum(&series), 0.2);
        assert_relative_eq!(last_location_of_maximum(&series), 0.8);
        assert_relative_eq!(first_location_of_minimum(&series), 0.4);
        assert_relative_eq!(last_location_of_minimum(&series), 1.0);
        assert!(first_location_of_maximum(&[]).is_nan());
    }

    #[test]
    fn duplicates() {
        assert!(has_duplicate(&[1.0, 2.0, 1.0]));
        assert!(!has_duplicate(&[1.0, 2.0, 3.0]));
        assert!(has_duplicate_max(&[3.0, 1.0, 3.0]));
        assert!(!has_duplicate_min(&[3.0, 1.0, 3.0]));
    }

    #[test]
    fn mass_quantile() {
        let series = [1.0, 1.0, 1.0, 1.0];
        assert_relative_eq!(index_mass_quantile(&series, 0.5), 0.5);
        assert_relative_eq!(index_mass_quantile(&series, 0.9), 1.0);
        assert!(index_mass_quantile(&[0.0, 0.0], 0.5).is_nan());
    }
}
