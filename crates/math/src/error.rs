//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// Too few observations for the requested statistic.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Design matrix does not have full column rank.
    #[error("rank deficient design matrix: rank {rank} < columns {columns}")]
    RankDeficient {
        /// Numerical rank.
        rank: usize,
        /// Number of columns.
        columns: usize,
    },

    /// Iterative solver hit its iteration cap.
    #[error("solver did not converge within {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
