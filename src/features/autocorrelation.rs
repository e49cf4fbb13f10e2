//! Serial correlation structure.

use super::basic::{mean, variance};

/// How a set of per-lag values is reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Mean,
    Median,
    Var,
}

impl Aggregate {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Mean => "mean",
            Aggregate::Median => "median",
            Aggregate::Var => "var",
        }
    }

    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregate::Mean => mean(values),
            Aggregate::Median => crate::utils::median(values),
            Aggregate::Var => {
                if values.is_empty() {
                    f64::NAN
                } else {
                    variance(values)
                }
            }
        }
    }
}

/// Autocorrelation at `lag`, normalised by the overlap length:
/// `sum((x[t] - mu)(x[t+lag] - mu)) / ((n - lag) * var)`.
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    let n = series.len();
    if lag >= n {
        return f64::NAN;
    }
    let m = mean(series);
    let var = variance(series);
    if var == 0.0 {
        return f64::NAN;
    }
    let cov: f64 = series
        .iter()
        .zip(&series[lag..])
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    cov / ((n - lag) as f64 * var)
}

/// Sample autocorrelation function for lags `1..=max_lag`, normalised by
/// the full length (`n * var`) so it stays bounded by 1.
pub fn acf(series: &[f64], max_lag: usize) -> Vec<f64> {
    let n = series.len();
    let m = mean(series);
    let denom = n as f64 * variance(series);
    (1..=max_lag.min(n.saturating_sub(1)))
        .map(|lag| {
            let cov: f64 = series
                .iter()
                .zip(&series[lag..])
                .map(|(a, b)| (a - m) * (b - m))
                .sum();
            if denom > 0.0 {
                cov / denom
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Aggregate of the autocorrelation function over lags `1..=max_lag`.
pub fn agg_autocorrelation(series: &[f64], max_lag: usize, agg: Aggregate) -> f64 {
    let values = acf(series, max_lag);
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    agg.apply(&values)
}

/// Partial autocorrelation at `lag` by the Durbin-Levinson recursion.
pub fn partial_autocorrelation(series: &[f64], lag: usize) -> f64 {
    if lag == 0 {
        return 1.0;
    }
    let rho = acf(series, lag);
    if rho.len() < lag || rho.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }

    // phi holds the AR(k) coefficients for the current order k.
    let mut phi = vec![rho[0]];
    for k in 2..=lag {
        let num = rho[k - 1] - (1..k).map(|j| phi[j - 1] * rho[k - 1 - j]).sum::<f64>();
        let den = 1.0 - (1..k).map(|j| phi[j - 1] * rho[j - 1]).sum::<f64>();
        if den.abs() < 1e-12 {
            return f64::NAN;
        }
        let kk = num / den;
        let previous = phi.clone();
        for j in 1..k {
            phi[j - 1] = previous[j - 1] - kk * previous[k - 1 - j];
        }
        phi.push(kk);
    }
    phi[lag - 1]
}

/// Mean of `x[i+2l]^2 * x[i+l] - x[i+l] * x[i]^2`.
pub fn time_reversal_asymmetry_statistic(series: &[f64], lag: usize) -> f64 {
    let n = series.len();
    if lag == 0 || 2 * lag >= n {
        return 0.0;
    }
    let count = n - 2 * lag;
    let total: f64 = (0..count)
        .map(|i| {
            let (a, b, c) = (series[i], series[i + lag], series[i + 2 * lag]);
            c * c * b - b * a * a
        })
        .sum();
    total / count as f64
}
