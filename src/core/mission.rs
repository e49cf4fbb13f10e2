//! Survey missions and their time systems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransitError;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Space photometry mission that produced a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mission {
    Kepler,
    Tess,
}

/// Name fragments that identify TESS-era catalogs.
const TESS_MARKERS: [&str; 8] = ["TIC", "TOI", "Pi ", "LHS", "WASP", "AU ", "GJ ", "HD "];

impl Mission {
    /// Guess the mission from a target designation.
    ///
    /// TESS input catalog ids and common ground-survey names map to TESS;
    /// everything else (Kepler-N, KIC, KOI) maps to Kepler.
    pub fn infer(target_id: &str) -> Self {
        if TESS_MARKERS.iter().any(|m| target_id.contains(m)) {
            Mission::Tess
        } else {
            Mission::Kepler
        }
    }

    /// Offset between the mission time system and BJD.
    ///
    /// Kepler uses BKJD = BJD - 2454833, TESS uses BTJD = BJD - 2457000.
    pub fn bjd_offset(self) -> f64 {
        match self {
            Mission::Kepler => 2_454_833.0,
            Mission::Tess => 2_457_000.0,
        }
    }

    /// Convert a mission timestamp (days) to a UTC calendar time.
    ///
    /// Barycentric correction and leap seconds are ignored, which is well
    /// below a minute and adequate for display.
    pub fn to_datetime(self, time: f64) -> Option<DateTime<Utc>> {
        if !time.is_finite() {
            return None;
        }
        let jd = time + self.bjd_offset();
        let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mission::Kepler => write!(f, "Kepler"),
            Mission::Tess => write!(f, "TESS"),
        }
    }
}

impl FromStr for Mission {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kepler" => Ok(Mission::Kepler),
            "tess" => Ok(Mission::Tess),
            other => Err(TransitError::InvalidParameter(format!(
                "unknown mission '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn infers_mission_from_designation() {
        assert_eq!(Mission::infer("Kepler-10"), Mission::Kepler);
        assert_eq!(Mission::infer("KIC 8462852"), Mission::Kepler);
        assert_eq!(Mission::infer("TIC 261136679"), Mission::Tess);
        assert_eq!(Mission::infer("TOI-700"), Mission::Tess);
        assert_eq!(Mission::infer("WASP-18"), Mission::Tess);
        assert_eq!(Mission::infer("Pi Mensae"), Mission::Tess);
    }

    #[test]
    fn parses_and_displays() {
        assert_eq!("tess".parse::<Mission>().unwrap(), Mission::Tess);
        assert_eq!("Kepler".parse::<Mission>().unwrap(), Mission::Kepler);
        assert!("k2".parse::<Mission>().is_err());
        assert_eq!(Mission::Tess.to_string(), "TESS");
    }

    #[test]
    fn converts_mission_time_to_calendar() {
        // BKJD 0 is BJD 2454833.0 = 2009-01-01 12:00 UTC
        let dt = Mission::Kepler.to_datetime(0.0).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2009, 1, 1));

        // BTJD 0 is BJD 2457000.0 = 2014-12-08 12:00 UTC
        let dt = Mission::Tess.to_datetime(0.0).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2014, 12, 8));

        assert!(Mission::Kepler.to_datetime(f64::NAN).is_none());
    }
}
