//! Frequency-domain features from the discrete Fourier transform of the
//! flux sequence (sample index as the time axis).

use super::entropy::binned_entropy;
use rustfft::{num_complex::Complex64, FftPlanner};

/// Moment of the magnitude spectrum treated as a distribution over
/// frequency index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralMoment {
    Centroid,
    Variance,
    Skew,
    Kurtosis,
}

impl SpectralMoment {
    pub fn name(&self) -> &'static str {
        match self {
            SpectralMoment::Centroid => "centroid",
            SpectralMoment::Variance => "variance",
            SpectralMoment::Skew => "skew",
            SpectralMoment::Kurtosis => "kurtosis",
        }
    }
}

/// Magnitudes of the non-negative frequency bins (`0..=n/2`).
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    magnitude: Vec<f64>,
}

impl Spectrum {
    pub fn of(series: &[f64]) -> Self {
        let n = series.len();
        if n == 0 {
            return Self::default();
        }
        let mut buffer: Vec<Complex64> = series.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(n).process(&mut buffer);
        buffer.truncate(n / 2 + 1);
        Self {
            magnitude: buffer.iter().map(|c| c.norm()).collect(),
        }
    }

    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Magnitude of coefficient `k`, `NaN` past the Nyquist bin.
    pub fn coefficient_abs(&self, k: usize) -> f64 {
        self.magnitude.get(k).copied().unwrap_or(f64::NAN)
    }

    /// Moment of the magnitude spectrum over frequency index.
    ///
    /// Skew and kurtosis are `NaN` when the spectral variance is below
    /// 0.5 (a single dominant bin).
    pub fn aggregated(&self, moment: SpectralMoment) -> f64 {
        let total: f64 = self.magnitude.iter().sum();
        if total == 0.0 {
            return f64::NAN;
        }
        let raw = |p: i32| -> f64 {
            self.magnitude
                .iter()
                .enumerate()
                .map(|(k, m)| m * (k as f64).powi(p))
                .sum::<f64>()
                / total
        };
        let mu = raw(1);
        let var = raw(2) - mu * mu;
        match moment {
            SpectralMoment::Centroid => mu,
            SpectralMoment::Variance => var,
            SpectralMoment::Skew if var >= 0.5 => {
                let m3 = raw(3) - 3.0 * mu * raw(2) + 2.0 * mu.powi(3);
                m3 / var.powf(1.5)
            }
            SpectralMoment::Kurtosis if var >= 0.5 => {
                let (r2, r3, r4) = (raw(2), raw(3), raw(4));
                let m4 = r4 - 4.0 * mu * r3 + 6.0 * mu * mu * r2 - 3.0 * mu.powi(4);
                m4 / (var * var)
            }
            _ => f64::NAN,
        }
    }

    /// Entropy of the power spectrum (excluding the mean), binned after
    /// scaling to its maximum.
    pub fn entropy(&self, bins: usize) -> f64 {
        let power: Vec<f64> = self.magnitude.iter().skip(1).map(|m| m * m).collect();
        let peak = power.iter().copied().fold(0.0, f64::max);
        let energy: f64 = self.magnitude.iter().map(|m| m * m).sum();
        // Rounding residue of a constant series
        if peak <= 1e-24 * energy {
            return 0.0;
        }
        let scaled: Vec<f64> = power.iter().map(|p| p / peak).collect();
        binned_entropy(&scaled, bins)
    }
}
