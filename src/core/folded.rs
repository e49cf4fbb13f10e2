//! Phase-folded view of a light curve.

/// A light curve re-indexed by orbital phase.
///
/// Phases lie in `[0, 1)` with the epoch at phase 0, and samples are
/// ordered by phase rather than by time. Produced by
/// [`crate::transform::fold`]; read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedCurve {
    phase: Vec<f64>,
    flux: Vec<f64>,
    period: f64,
    epoch: f64,
    target_id: Option<String>,
}

impl FoldedCurve {
    pub(crate) fn new(
        phase: Vec<f64>,
        flux: Vec<f64>,
        period: f64,
        epoch: f64,
        target_id: Option<String>,
    ) -> Self {
        debug_assert_eq!(phase.len(), flux.len());
        Self {
            phase,
            flux,
            period,
            epoch,
            target_id,
        }
    }

    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }

    /// Phases in `[0, 1)`, ascending.
    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    /// Phases in `[-0.5, 0.5)` with the transit centred at 0, ascending.
    pub fn centered(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .phase
            .iter()
            .zip(&self.flux)
            .map(|(&p, &f)| (if p >= 0.5 { p - 1.0 } else { p }, f))
            .collect();
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        points
    }

    /// Mean flux in `n_bins` equal-width phase bins.
    ///
    /// Returns `(bin centre phase, mean flux)` for every non-empty bin.
    pub fn binned(&self, n_bins: usize) -> Vec<(f64, f64)> {
        if n_bins == 0 || self.is_empty() {
            return Vec::new();
        }
        let mut sums = vec![0.0; n_bins];
        let mut counts = vec![0usize; n_bins];
        for (&p, &f) in self.phase.iter().zip(&self.flux) {
            let idx = ((p * n_bins as f64) as usize).min(n_bins - 1);
            sums[idx] += f;
            counts[idx] += 1;
        }
        (0..n_bins)
            .filter(|&i| counts[i] > 0)
            .map(|i| {
                (
                    (i as f64 + 0.5) / n_bins as f64,
                    sums[i] / counts[i] as f64,
                )
            })
            .collect()
    }

    /// Every k-th point (k = max(1, len / max_points)), for display payloads.
    pub fn downsample(&self, max_points: usize) -> Vec<(f64, f64)> {
        let step = (self.len() / max_points.max(1)).max(1);
        self.phase
            .iter()
            .zip(&self.flux)
            .step_by(step)
            .map(|(&p, &f)| (p, f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> FoldedCurve {
        FoldedCurve::new(
            vec![0.0, 0.1, 0.45, 0.55, 0.9],
            vec![0.99, 1.0, 1.0, 1.0, 0.995],
            5.0,
            0.0,
            Some("Kepler-10".to_string()),
        )
    }

    #[test]
    fn centered_wraps_upper_half() {
        let points = sample().centered();
        let phases: Vec<f64> = points.iter().map(|p| p.0).collect();
        assert_relative_eq!(phases[0], -0.45, epsilon = 1e-12);
        assert_relative_eq!(phases[1], -0.1, epsilon = 1e-12);
        assert_relative_eq!(phases[2], 0.0);
        assert!(phases.iter().all(|&p| (-0.5..0.5).contains(&p)));
    }

    #[test]
    fn binned_averages_per_bin() {
        let bins = sample().binned(2);
        assert_eq!(bins.len(), 2);
        assert_relative_eq!(bins[0].0, 0.25);
        assert_relative_eq!(bins[0].1, (0.99 + 1.0 + 1.0) / 3.0, epsilon = 1e-12);
        assert_relative_eq!(bins[1].1, (1.0 + 0.995) / 2.0, epsilon = 1e-12);
        assert!(sample().binned(0).is_empty());
    }

    #[test]
    fn downsample_limits_points() {
        let n = 2500;
        let folded = FoldedCurve::new(
            (0..n).map(|i| i as f64 / n as f64).collect(),
            vec![1.0; n],
            1.0,
            0.0,
            None,
        );
        let shown = folded.downsample(1000);
        assert_eq!(shown.len(), 1250);
        assert_eq!(folded.downsample(5000).len(), n);
    }
}
