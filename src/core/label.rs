//! Class labels for training samples.

use crate::error::{Result, TransitError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ground-truth class of a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    /// No transit, or a false positive.
    NoTransit,
    /// Confirmed transiting planet.
    Transit,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::NoTransit => 0,
            Label::Transit => 1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Transit
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = TransitError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Label::NoTransit),
            1 => Ok(Label::Transit),
            other => Err(TransitError::InvalidParameter(format!(
                "label must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_integer() {
        assert_eq!(Label::try_from(0).unwrap(), Label::NoTransit);
        assert_eq!(Label::try_from(1).unwrap(), Label::Transit);
        assert!(Label::try_from(2).is_err());
        assert_eq!(u8::from(Label::Transit), 1);
        assert_eq!(Label::NoTransit.to_string(), "0");
    }

    #[test]
    fn label_serializes_as_integer() {
        let json = serde_json::to_string(&vec![Label::Transit, Label::NoTransit]).unwrap();
        assert_eq!(json, "[1,0]");
        let parsed: Vec<Label> = serde_json::from_str("[0,1]").unwrap();
        assert_eq!(parsed, vec![Label::NoTransit, Label::Transit]);
    }
}
