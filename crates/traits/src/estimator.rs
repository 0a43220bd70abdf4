//! Style estimation trait definitions.

use ndarray::{Array1, ArrayView1, ArrayView2};

/// Errors that can occur while fitting a window.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    /// Dimension mismatch in input data.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Insufficient data for estimation.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Rank deficiency in design matrix.
    #[error("rank deficient design matrix: rank {rank} < columns {columns}")]
    RankDeficient {
        /// Actual rank.
        rank: usize,
        /// Number of columns.
        columns: usize,
    },

    /// NaN or infinite values in the window or in the fitted weights.
    #[error("non-finite values in {0}")]
    NonFiniteInput(String),

    /// Fitted weights that do not form a valid exposure.
    #[error("invalid fitted weights: {0}")]
    InvalidWeights(String),

    /// Solver hit its iteration cap.
    #[error("solver did not converge within {iterations} iterations")]
    NotConverged {
        /// Iteration cap that was reached.
        iterations: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
}

impl EstimatorError {
    /// Returns whether this error is local to one window, so a rolling run
    /// can record it and move on.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. }
                | Self::RankDeficient { .. }
                | Self::NonFiniteInput(_)
                | Self::InvalidWeights(_)
                | Self::NotConverged { .. }
                | Self::LinearAlgebra(_)
        )
    }
}

/// Trait for fitting style weights over a single window.
pub trait StyleEstimator: Send + Sync {
    /// Configuration type for this estimator.
    type Config: Default + Clone + Send + Sync;

    /// Create a new estimator with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Fit style weights for one window.
    ///
    /// # Arguments
    /// * `returns` - Fund returns over the window (n_obs,)
    /// * `styles` - Style factor returns over the window (n_obs x n_factors)
    ///
    /// # Returns
    /// Weights, one per style column, in column order.
    ///
    /// # Errors
    /// Returns `EstimatorError` if dimensions mismatch, the window holds
    /// non-finite values, or the solver fails.
    fn estimate_window(
        &self,
        returns: ArrayView1<'_, f64>,
        styles: ArrayView2<'_, f64>,
    ) -> Result<Array1<f64>, EstimatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimator_error_is_recoverable() {
        let err = EstimatorError::InsufficientData { required: 10, actual: 5 };
        assert!(err.is_recoverable());

        let err = EstimatorError::NotConverged { iterations: 500 };
        assert!(err.is_recoverable());

        let err = EstimatorError::InvalidWeights("weights sum to 1.25".to_string());
        assert!(err.is_recoverable());

        let err = EstimatorError::InvalidConfig("tolerance".to_string());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn estimator_error_display() {
        let err = EstimatorError::DimensionMismatch {
            expected: 100,
            actual: 50,
            context: "returns".to_string(),
        };
        assert_eq!(err.to_string(), "dimension mismatch for returns: expected 100, got 50");

        let err = EstimatorError::NonFiniteInput("window".to_string());
        assert_eq!(err.to_string(), "non-finite values in window");
    }
}
