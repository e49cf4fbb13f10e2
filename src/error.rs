//! Error types for the exotransit library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, TransitError>;

/// Errors that can occur while processing light curves.
///
/// Conditions that callers are expected to handle routinely (unknown
/// target, too few samples) are not errors: they are reported through
/// [`crate::core::Outcome`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// NaN or infinite values where only finite values are allowed.
    #[error("non-finite values in {0}")]
    NonFinite(String),

    /// Filesystem error.
    #[error("i/o error: {0}")]
    Io(String),

    /// Malformed CSV input or output failure.
    #[error("csv error: {0}")]
    Csv(String),

    /// Malformed JSON document.
    #[error("json error: {0}")]
    Json(String),

    /// Failure reported by the classifier collaborator.
    #[error("classifier error: {0}")]
    Classifier(String),
}

impl From<std::io::Error> for TransitError {
    fn from(err: std::io::Error) -> Self {
        TransitError::Io(err.to_string())
    }
}

impl From<csv::Error> for TransitError {
    fn from(err: csv::Error) -> Self {
        TransitError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for TransitError {
    fn from(err: serde_json::Error) -> Self {
        TransitError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = TransitError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = TransitError::InsufficientData { needed: 10, got: 4 };
        assert_eq!(err.to_string(), "insufficient data: need at least 10, got 4");

        let err = TransitError::InvalidParameter("period must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: period must be positive");

        let err = TransitError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");
    }

    #[test]
    fn io_errors_convert_to_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: TransitError = io.into();
        assert!(matches!(err, TransitError::Io(ref m) if m.contains("missing.csv")));
    }

    #[test]
    fn json_errors_convert_to_message() {
        let parse = serde_json::from_str::<Vec<String>>("[1,").unwrap_err();
        let err: TransitError = parse.into();
        assert!(matches!(err, TransitError::Json(_)));
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = TransitError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
