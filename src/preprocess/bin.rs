//! Fixed-width time binning.

use crate::core::{LightCurve, LightCurveParts};
use crate::error::{Result, TransitError};

/// Aggregate samples into fixed-width time bins.
///
/// Bins sit on an absolute grid (`floor(t / width)`), so binning an
/// already-binned curve with the same width is a no-op. Each non-empty bin
/// yields one sample at the bin centre with the mean flux; errors combine
/// as `sqrt(sum(err^2)) / n` and quality flags are OR-ed. Empty bins are
/// omitted.
///
/// The input must be sorted by time with finite timestamps.
pub fn bin(lc: &LightCurve, width: f64) -> Result<LightCurve> {
    if !(width > 0.0 && width.is_finite()) {
        return Err(TransitError::InvalidParameter(format!(
            "bin width must be positive, got {width}"
        )));
    }
    if lc.time().iter().any(|t| !t.is_finite()) {
        return Err(TransitError::NonFinite("time".to_string()));
    }

    let time = lc.time();
    let flux = lc.flux();
    let err = lc.flux_err();
    let quality = lc.quality();

    let mut parts = LightCurveParts {
        target_id: lc.target_id().map(str::to_string),
        flux_err: err.map(|_| Vec::new()),
        quality: quality.map(|_| Vec::new()),
        ..Default::default()
    };

    let mut start = 0;
    while start < time.len() {
        let index = (time[start] / width).floor();
        let mut end = start + 1;
        while end < time.len() && (time[end] / width).floor() == index {
            end += 1;
        }

        let count = (end - start) as f64;
        parts.time.push((index + 0.5) * width);
        parts.flux.push(flux[start..end].iter().sum::<f64>() / count);
        if let (Some(out), Some(e)) = (parts.flux_err.as_mut(), err) {
            out.push(e[start..end].iter().map(|x| x * x).sum::<f64>().sqrt() / count);
        }
        if let (Some(out), Some(q)) = (parts.quality.as_mut(), quality) {
            out.push(q[start..end].iter().fold(0, |acc, &flag| acc | flag));
        }
        start = end;
    }

    Ok(LightCurve::from_parts(parts))
}
