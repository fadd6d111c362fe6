//! Error types for clasificar operations.
//!
//! Configuration and validation problems are surfaced synchronously, before
//! any gradient step runs. Numeric degeneracies (non-overlapping threshold
//! ranges, chance agreement of 1 in kappa) are never errors; they are
//! recovered locally with documented fallback values.

use std::fmt;

/// Main error type for clasificar operations.
///
/// # Examples
///
/// ```
/// use clasificar::error::ClasificarError;
///
/// let err = ClasificarError::InvalidHyperparameter {
///     param: "learning_rate".to_string(),
///     value: "-0.5".to_string(),
///     constraint: "> 0".to_string(),
/// };
/// assert!(err.to_string().contains("learning_rate"));
/// ```
#[derive(Debug)]
pub enum ClasificarError {
    /// Malformed configuration value, rejected at call time.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Training input cannot produce a model: insufficient class diversity,
    /// empty vocabulary after filtering, missing column values, or a
    /// canceled run.
    ValidationError {
        /// Validation failure message
        message: String,
    },

    /// Feature vector length does not match the model's weight vector.
    DimensionMismatch {
        /// Expected length description
        expected: String,
        /// Actual length found
        actual: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ClasificarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasificarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            ClasificarError::ValidationError { message } => {
                write!(f, "Validation failed: {message}")
            }
            ClasificarError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            ClasificarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ClasificarError {}

impl From<&str> for ClasificarError {
    fn from(msg: &str) -> Self {
        ClasificarError::Other(msg.to_string())
    }
}

impl From<String> for ClasificarError {
    fn from(msg: String) -> Self {
        ClasificarError::Other(msg)
    }
}

impl ClasificarError {
    /// Create a validation error with a descriptive message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error from expected and actual lengths.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid hyperparameter error.
    #[must_use]
    pub fn hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ClasificarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = ClasificarError::hyperparameter("lambda", -1.0, ">= 0");
        let msg = err.to_string();
        assert!(msg.contains("Invalid hyperparameter"));
        assert!(msg.contains("lambda"));
        assert!(msg.contains("-1"));
        assert!(msg.contains(">= 0"));
    }

    #[test]
    fn test_validation_display() {
        let err = ClasificarError::validation("vocabulary is empty after filtering");
        assert!(err.to_string().contains("Validation failed"));
        assert!(err.to_string().contains("vocabulary is empty"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = ClasificarError::dimension_mismatch("features", 12, 7);
        let msg = err.to_string();
        assert!(msg.contains("features=12"));
        assert!(msg.contains("7"));
    }

    #[test]
    fn test_from_str() {
        let err: ClasificarError = "test error".into();
        assert!(matches!(err, ClasificarError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: ClasificarError = "test error".to_string().into();
        assert!(matches!(err, ClasificarError::Other(_)));
    }
}
