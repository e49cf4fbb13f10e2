//! Information-theoretic measures.
//!
//! Only measures linear (or `n log n`) in the series length are provided;
//! pairwise template matching entropies do not scale to light curves with
//! tens of thousands of samples.

use super::basic::{maximum, minimum};
use std::collections::BTreeMap;

/// Shannon entropy (natural log) of a set of counts.
pub(crate) fn shannon(counts: impl IntoIterator<Item = usize>, total: usize) -> f64 {
    if total == 0 {
        return f64::NAN;
    }
    counts
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

/// Entropy of the value histogram with `max_bins` equal-width bins.
pub fn binned_entropy(series: &[f64], max_bins: usize) -> f64 {
    if series.is_empty() || max_bins == 0 {
        return f64::NAN;
    }
    let lo = minimum(series);
    let span = maximum(series) - lo;
    if span == 0.0 {
        return 0.0;
    }
    let mut counts = vec![0usize; max_bins];
    for x in series {
        let bin = ((x - lo) / span * max_bins as f64) as usize;
        counts[bin.min(max_bins - 1)] += 1;
    }
    shannon(counts, series.len())
}

/// Entropy of the ordinal patterns of `dimension` samples spaced `tau`
/// apart. Ties rank by position.
pub fn permutation_entropy(series: &[f64], dimension: usize, tau: usize) -> f64 {
    if dimension < 2 || tau == 0 {
        return f64::NAN;
    }
    let span = (dimension - 1) * tau;
    if series.len() <= span {
        return f64::NAN;
    }
    let windows = series.len() - span;
    let mut patterns: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
    let mut order: Vec<usize> = Vec::with_capacity(dimension);
    for start in 0..windows {
        order.clear();
        order.extend(0..dimension);
        order.sort_by(|&a, &b| series[start + a * tau].total_cmp(&series[start + b * tau]));
        // dimension is small, so positions fit in a byte
        let key: Vec<u8> = order.iter().map(|&i| i as u8).collect();
        *patterns.entry(key).or_insert(0) += 1;
    }
    shannon(patterns.into_values(), windows)
}
