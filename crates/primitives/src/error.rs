//! Error types for primitive construction.

/// Errors raised when building primitive types from raw data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    /// Two inputs that must have the same length do not.
    #[error("length mismatch for {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
        /// What was being compared.
        context: String,
    },

    /// Dates are not strictly increasing.
    #[error("date index not strictly increasing at position {position}")]
    UnorderedDates {
        /// Position of the first offending date.
        position: usize,
    },

    /// A factor matrix without columns.
    #[error("at least one style factor is required")]
    NoFactors,

    /// The same factor name appears twice.
    #[error("duplicate factor name: {0}")]
    DuplicateFactor(String),

    /// Exposure weights outside the probability simplex.
    #[error("weights are not on the simplex: {0}")]
    NotOnSimplex(String),

    /// Unrecognized period code.
    #[error("unknown period code: {0:?} (expected one of d, w, m, q, s, y)")]
    UnknownPeriod(String),
}
