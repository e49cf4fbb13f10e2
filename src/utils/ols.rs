//! Ordinary least squares by the normal equations.
//!
//! The flattening filter fits a low-order polynomial to every window of a
//! light curve from running power sums ([`solve_from_sums`]); the trend
//! features regress on explicit rows ([`lstsq`]).

/// Solve the polynomial normal equations given accumulated sums.
///
/// `power_sums[k] = sum(x^k)` for `k in 0..=2*degree` and
/// `moment_sums[k] = sum(x^k * y)` for `k in 0..=degree`.
pub fn solve_from_sums(power_sums: &[f64], moment_sums: &[f64]) -> Option<Vec<f64>> {
    let n = moment_sums.len();
    if n == 0 || power_sums.len() < 2 * n - 1 {
        return None;
    }
    let xtx: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| power_sums[i + j]).collect())
        .collect();
    solve_symmetric(&xtx, moment_sums)
}

/// Multiple linear regression by the normal equations.
///
/// `rows` are the regressor vectors (one per observation, all the same
/// length). Returns the coefficient vector, or `None` when singular.
pub fn lstsq(rows: &[Vec<f64>], y: &[f64]) -> Option<Vec<f64>> {
    let p = rows.first()?.len();
    if rows.len() != y.len() || rows.len() < p || rows.iter().any(|r| r.len() != p) {
        return None;
    }
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (row, &yi) in rows.iter().zip(y) {
        for i in 0..p {
            xty[i] += row[i] * yi;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }
    solve_symmetric(&xtx, &xty)
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];
    let scale = a.iter().enumerate().map(|(i, row)| row[i].abs()).fold(0.0, f64::max);

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 1e-12 * scale.max(1e-300) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
