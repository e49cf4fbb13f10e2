//! Changes inside value corridors, energy distribution and repeated values.

use super::autocorrelation::Aggregate;
use super::distribution::quantile_sorted;
use crate::utils::sorted_finite;

/// Aggregate of consecutive changes whose endpoints both lie inside the
/// corridor between the `ql` and `qh` quantiles.
pub fn change_quantiles(series: &[f64], ql: f64, qh: f64, is_abs: bool, agg: Aggregate) -> f64 {
    if ql >= qh {
        return 0.0;
    }
    let sorted = sorted_finite(series);
    let (lo, hi) = (quantile_sorted(&sorted, ql), quantile_sorted(&sorted, qh));
    let inside = |x: f64| x >= lo && x <= hi;
    let changes: Vec<f64> = series
        .windows(2)
        .filter(|w| inside(w[0]) && inside(w[1]))
        .map(|w| if is_abs { (w[1] - w[0]).abs() } else { w[1] - w[0] })
        .collect();
    if changes.is_empty() {
        return 0.0;
    }
    agg.apply(&changes)
}

/// Share of the total energy (sum of squares) in segment `focus` of
/// `segments` near-equal consecutive segments (earlier segments take the
/// remainder).
pub fn energy_ratio_by_chunks(series: &[f64], segments: usize, focus: usize) -> f64 {
    if segments == 0 || focus >= segments || series.is_empty() {
        return f64::NAN;
    }
    let total: f64 = series.iter().map(|x| x * x).sum();
    if total == 0.0 {
        return f64::NAN;
    }
    let (base, extra) = (series.len() / segments, series.len() % segments);
    let start = focus * base + focus.min(extra);
    let len = base + usize::from(focus < extra);
    series[start..start + len].iter().map(|x| x * x).sum::<f64>() / total
}

/// Run lengths of equal values in sorted order.
fn value_runs(series: &[f64]) -> Vec<(f64, usize)> {
    let sorted = sorted_finite(series);
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for x in sorted {
        match runs.last_mut() {
            Some((value, count)) if *value == x => *count += 1,
            _ => runs.push((x, 1)),
        }
    }
    runs
}

/// Share of samples whose value occurs more than once.
pub fn percentage_of_reoccurring_datapoints_to_all_datapoints(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    let repeated: usize = value_runs(series).iter().filter(|r| r.1 > 1).map(|r| r.1).sum();
    repeated as f64 / series.len() as f64
}

/// Share of distinct values that occur more than once.
pub fn percentage_of_reoccurring_values_to_all_values(series: &[f64]) -> f64 {
    let runs = value_runs(series);
    if runs.is_empty() {
        return f64::NAN;
    }
    runs.iter().filter(|r| r.1 > 1).count() as f64 / runs.len() as f64
}

/// Sum of every sample whose value occurs more than once.
pub fn sum_of_reoccurring_data_points(series: &[f64]) -> f64 {
    value_runs(series)
        .iter()
        .filter(|r| r.1 > 1)
        .map(|(v, c)| v * *c as f64)
        .sum()
}

/// Sum of the distinct values that occur more than once.
pub fn sum_of_reoccurring_values(series: &[f64]) -> f64 {
    value_runs(series).iter().filter(|r| r.1 > 1).map(|r| r.0).sum()
}

/// Number of distinct values relative to the length.
pub fn ratio_value_number_to_time_series_length(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    value_runs(series).len() as f64 / series.len() as f64
}
