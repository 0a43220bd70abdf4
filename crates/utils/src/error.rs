//! Error types for utility functions.

use ppe_primitives::PrimitivesError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The extracted data does not form a valid series.
    #[error("invalid data: {0}")]
    Primitives(#[from] PrimitivesError),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Date cell that is null or not `%Y-%m-%d`.
    #[error("invalid date at row {row}: {value:?}")]
    InvalidDate {
        /// Row index.
        row: usize,
        /// Cell content.
        value: String,
    },

    /// Column of a type that cannot be read as requested.
    #[error("column {column} has unsupported type {dtype}")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// Polars data type.
        dtype: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::InvalidDate { row: 2, value: "2024/01/03".to_string() };
        assert_eq!(err.to_string(), "invalid date at row 2: \"2024/01/03\"");

        let err = UtilsError::MissingColumn("fund".to_string());
        assert!(err.to_string().contains("fund"));
    }
}
