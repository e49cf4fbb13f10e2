//! Phase folding.

use crate::core::{FoldedCurve, LightCurve};
use crate::error::{Result, TransitError};

/// Orbital phase of every sample, in time order.
///
/// `phase = ((t - epoch) mod period) / period`, always in `[0, 1)`.
pub fn phases(time: &[f64], period: f64, epoch: f64) -> Vec<f64> {
    time.iter()
        .map(|&t| {
            let p = (t - epoch).rem_euclid(period) / period;
            // rem_euclid can round up to exactly `period` for tiny negatives
            if p >= 1.0 {
                0.0
            } else {
                p
            }
        })
        .collect()
}

/// Fold a light curve at `period`.
///
/// The epoch defaults to the first timestamp. Samples are reordered by
/// phase; samples with equal phase keep their time order.
pub fn fold(lc: &LightCurve, period: f64, epoch: Option<f64>) -> Result<FoldedCurve> {
    if !(period > 0.0 && period.is_finite()) {
        return Err(TransitError::InvalidParameter(format!(
            "period must be positive and finite, got {period}"
        )));
    }
    let epoch = match epoch {
        Some(e) if !e.is_finite() => {
            return Err(TransitError::NonFinite("epoch".to_string()));
        }
        Some(e) => e,
        None => lc.time().first().copied().unwrap_or(0.0),
    };

    let phase = phases(lc.time(), period, epoch);
    let mut order: Vec<usize> = (0..phase.len()).collect();
    order.sort_by(|&a, &b| {
        phase[a]
            .partial_cmp(&phase[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sorted_phase = order.iter().map(|&i| phase[i]).collect();
    let sorted_flux = order.iter().map(|&i| lc.flux()[i]).collect();
    Ok(FoldedCurve::new(
        sorted_phase,
        sorted_flux,
        period,
        epoch,
        lc.target_id().map(str::to_string),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn phases_wrap_at_period() {
        let p = phases(&[0.0, 1.5, 3.0], 3.0, 0.0);
        assert_eq!(p, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn phases_before_epoch_are_positive() {
        let p = phases(&[9.0, 10.0], 4.0, 10.5);
        assert_relative_eq!(p[0], 0.625);
        assert_relative_eq!(p[1], 0.875);
    }

    #[test]
    fn fold_sorts_by_phase() {
        let lc = LightCurve::builder()
            .time(vec![0.0, 0.75, 1.25, 2.5])
            .flux(vec![1.0, 2.0, 3.0, 4.0])
            .target_id("TIC 1")
            .build()
            .unwrap();
        let folded = fold(&lc, 1.0, None).unwrap();
        assert_eq!(folded.phase(), &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(folded.flux(), &[1.0, 3.0, 4.0, 2.0]);
        assert_relative_eq!(folded.epoch(), 0.0);
        assert_eq!(folded.target_id(), Some("TIC 1"));
    }

    #[test]
    fn fold_with_explicit_epoch() {
        let lc = LightCurve::new(vec![1.0, 2.0, 3.0], vec![1.0; 3]).unwrap();
        let folded = fold(&lc, 2.0, Some(0.0)).unwrap();
        assert_eq!(folded.phase(), &[0.0, 0.5, 0.5]);
        assert_relative_eq!(folded.period(), 2.0);
    }

    #[test]
    fn fold_rejects_bad_period() {
        let lc = LightCurve::new(vec![0.0], vec![1.0]).unwrap();
        assert!(fold(&lc, 0.0, None).is_err());
        assert!(fold(&lc, -1.0, None).is_err());
        assert!(fold(&lc, f64::NAN, None).is_err());
        assert!(fold(&lc, 1.0, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn fold_empty_curve() {
        let lc = LightCurve::new(vec![], vec![]).unwrap();
        assert!(fold(&lc, 1.0, None).unwrap().is_empty());
    }
}
