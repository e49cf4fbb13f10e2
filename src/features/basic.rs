//! Location, scale and first-difference statistics.
//!
//! Every function takes the flux values in time order and returns `NaN`
//! when the statistic is undefined for the input.

/// Sum of all values.
pub fn sum_values(series: &[f64]) -> f64 {
    series.iter().sum()
}

/// Arithmetic mean.
pub fn mean(series: &[f64]) -> f64 {
    crate::utils::mean(series)
}

/// Middle value (average of the two middle values for even lengths).
pub fn median(series: &[f64]) -> f64 {
    crate::utils::median(series)
}

pub fn length(series: &[f64]) -> f64 {
    series.len() as f64
}

/// Population variance (`n` denominator).
pub fn variance(series: &[f64]) -> f64 {
    let m = mean(series);
    series.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / series.len() as f64
}

/// Population standard deviation.
pub fn standard_deviation(series: &[f64]) -> f64 {
    variance(series).sqrt()
}

/// Sum of squared values.
pub fn abs_energy(series: &[f64]) -> f64 {
    series.iter().map(|x| x * x).sum()
}

/// Quadratic mean.
pub fn root_mean_square(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    (abs_energy(series) / series.len() as f64).sqrt()
}

pub fn maximum(series: &[f64]) -> f64 {
    series.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

pub fn minimum(series: &[f64]) -> f64 {
    series.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

/// Largest absolute value.
pub fn absolute_maximum(series: &[f64]) -> f64 {
    series.iter().map(|x| x.abs()).reduce(f64::max).unwrap_or(f64::NAN)
}

/// `sum(|x[i+1] - x[i]|)`.
pub fn absolute_sum_of_changes(series: &[f64]) -> f64 {
    series.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

/// Mean of `|x[i+1] - x[i]|`.
pub fn mean_abs_change(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return f64::NAN;
    }
    absolute_sum_of_changes(series) / (series.len() - 1) as f64
}

/// Mean of `x[i+1] - x[i]`, which telescopes to `(last - first) / (n - 1)`.
pub fn mean_change(series: &[f64]) -> f64 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => {
            (last - first) / (series.len() - 1) as f64
        }
        _ => f64::NAN,
    }
}

/// Mean of the central second difference `(x[i+2] - 2 x[i+1] + x[i]) / 2`.
pub fn mean_second_derivative_central(series: &[f64]) -> f64 {
    if series.len() < 3 {
        return f64::NAN;
    }
    let total: f64 = series.windows(3).map(|w| 0.5 * (w[2] - 2.0 * w[1] + w[0])).sum();
    total / (series.len() - 2) as f64
}

/// Standard deviation relative to the mean.
pub fn variation_coefficient(series: &[f64]) -> f64 {
    let m = mean(series);
    if m == 0.0 {
        return f64::NAN;
    }
    standard_deviation(series) / m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SERIES: [f64; 5] = [1.0, 3.0, 2.0, 5.0, 4.0];

    #[test]
    fn location_and_scale() {
        assert_relative_eq!(sum_values(&SERIES), 15.0);
        assert_relative_eq!(mean(&SERIES), 3.0);
        assert_relative_eq!(median(&SERIES), 3.0);
        assert_relative_eq!(length(&SERIES), 5.0);
        assert_relative_eq!(variance(&SERIES), 2.0);
        assert_relative_eq!(standard_deviation(&SERIES), 2.0_f64.sqrt());
        assert_relative_eq!(abs_energy(&SERIES), 55.0);
        assert_relative_eq!(root_mean_square(&SERIES), 11.0_f64.sqrt());
        assert_relative_eq!(variation_coefficient(&SERIES), 2.0_f64.sqrt() / 3.0);
    }

    #[test]
    fn extrema() {
        assert_relative_eq!(maximum(&SERIES), 5.0);
        assert_relative_eq!(minimum(&SERIES), 1.0);
        assert_relative_eq!(absolute_maximum(&[-7.0, 3.0]), 7.0);
        assert!(maximum(&[]).is_nan());
    }

    #[test]
    fn changes() {
        // diffs: 2, -1, 3, -1
        assert_relative_eq!(absolute_sum_of_changes(&SERIES), 7.0);
        assert_relative_eq!(mean_abs_change(&SERIES), 1.75);
        assert_relative_eq!(mean_change(&SERIES), 0.75);
        // second differences: -3, 4, -4 -> halved mean -0.5
        assert_relative_eq!(mean_second_derivative_central(&SERIES), -0.5);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(mean(&[]).is_nan());
        assert!(mean_change(&[1.0]).is_nan());
        assert!(mean_second_derivative_central(&[1.0, 2.0]).is_nan());
        assert!(variation_coefficient(&[1.0, -1.0]).is_nan());
        assert_relative_eq!(variance(&[2.0; 4]), 0.0);
    }
}
