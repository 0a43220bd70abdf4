//! Error types for rolling style analysis.

use ppe_math::MathError;
use ppe_primitives::{Date, PrimitivesError};
use ppe_traits::EstimatorError;

/// Errors that can occur during style attribution.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Inputs rejected before any window was fitted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A window could not be fitted and the run was aborted.
    #[error("window {index} ending {date} failed: {source}")]
    NumericalFailure {
        /// Window index.
        index: usize,
        /// Date the window's row is keyed by.
        date: Date,
        /// Underlying estimator error.
        source: EstimatorError,
    },

    /// Primitive construction error.
    #[error("invalid data: {0}")]
    Primitives(#[from] PrimitivesError),

    /// Estimator error.
    #[error("estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ModelError {
    /// Returns whether this error came from fitting rather than from the inputs.
    #[must_use]
    pub const fn is_numerical(&self) -> bool {
        matches!(self, Self::NumericalFailure { .. } | Self::Math(_) | Self::Estimator(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::InvalidInput("window 1 is shorter than 2".to_string());
        assert_eq!(err.to_string(), "invalid input: window 1 is shorter than 2");

        let err = ModelError::NumericalFailure {
            index: 3,
            date: Date::from_ymd_opt(2024, 1, 5).unwrap(),
            source: EstimatorError::NotConverged { iterations: 500 },
        };
        assert_eq!(
            err.to_string(),
            "window 3 ending 2024-01-05 failed: solver did not converge within 500 iterations"
        );
    }

    #[test]
    fn error_is_numerical() {
        let err = ModelError::Math(MathError::EmptyData);
        assert!(err.is_numerical());

        let err = ModelError::InvalidInput("dates".to_string());
        assert!(!err.is_numerical());
    }
}
