//! Linear trend and autoregressive structure.

use super::autocorrelation::Aggregate;
use crate::utils::lstsq;

/// Least-squares line through `(index, value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between index and value.
    pub rvalue: f64,
    /// Standard error of the slope.
    pub stderr: f64,
}

/// Attribute of a [`LinearTrend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendAttr {
    Slope,
    Intercept,
    Rvalue,
    Stderr,
}

impl TrendAttr {
    pub fn name(&self) -> &'static str {
        match self {
            TrendAttr::Slope => "slope",
            TrendAttr::Intercept => "intercept",
            TrendAttr::Rvalue => "rvalue",
            TrendAttr::Stderr => "stderr",
        }
    }
}

impl LinearTrend {
    pub fn get(&self, attr: TrendAttr) -> f64 {
        match attr {
            TrendAttr::Slope => self.slope,
            TrendAttr::Intercept => self.intercept,
            TrendAttr::Rvalue => self.rvalue,
            TrendAttr::Stderr => self.stderr,
        }
    }
}

/// Regress the values on their index.
pub fn linear_trend(series: &[f64]) -> LinearTrend {
    let n = series.len();
    if n < 2 {
        return LinearTrend {
            slope: f64::NAN,
            intercept: f64::NAN,
            rvalue: f64::NAN,
            stderr: f64::NAN,
        };
    }
    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / nf;
    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, y) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let rvalue = if syy > 0.0 { sxy / (sxx * syy).sqrt() } else { 0.0 };
    let stderr = if n > 2 {
        let residual = (syy - slope * sxy).max(0.0);
        (residual / (nf - 2.0) / sxx).sqrt()
    } else {
        0.0
    };
    LinearTrend {
        slope,
        intercept,
        rvalue,
        stderr,
    }
}

/// Fit a line to the aggregate of consecutive chunks of `chunk_len`
/// values and report one attribute of it.
pub fn agg_linear_trend(series: &[f64], chunk_len: usize, agg: Aggregate, attr: TrendAttr) -> f64 {
    if chunk_len == 0 {
        return f64::NAN;
    }
    let reduced: Vec<f64> = series.chunks(chunk_len).map(|c| agg.apply(c)).collect();
    linear_trend(&reduced).get(attr)
}

/// Coefficient `coeff` of an AR(`k`) model `x[t] = c0 + sum(c_i x[t-i])`
/// fitted by least squares.
pub fn ar_coefficient(series: &[f64], k: usize, coeff: usize) -> f64 {
    if coeff > k || series.len() <= 2 * k + 1 {
        return f64::NAN;
    }
    let rows: Vec<Vec<f64>> = (k..series.len())
        .map(|t| {
            let mut row = Vec::with_capacity(k + 1);
            row.push(1.0);
            row.extend((1..=k).map(|i| series[t - i]));
            row
        })
        .collect();
    match lstsq(&rows, &series[k..]) {
        Some(c) => c[coeff],
        None => f64::NAN,
    }
}
