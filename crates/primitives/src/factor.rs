//! Style factor type definitions.

use std::collections::HashSet;

use derive_more::Display;
use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};

use crate::{Date, PrimitivesError, series::check_dates};

/// Name of a style factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct FactorName(pub String);

impl FactorName {
    /// Create a new factor name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the factor name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FactorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Style factor returns aligned on a date index (n_dates x n_factors).
///
/// Column order defines factor identity and is carried through to any
/// exposures estimated against the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleFactorMatrix {
    dates: Vec<Date>,
    factor_names: Vec<FactorName>,
    values: Array2<f64>,
}

impl StyleFactorMatrix {
    /// Create a style factor matrix.
    ///
    /// # Errors
    /// Returns an error if there are no factors, names repeat, the matrix shape
    /// disagrees with the dates or names, or the dates are not strictly increasing.
    pub fn new(
        dates: Vec<Date>,
        factor_names: Vec<FactorName>,
        values: Array2<f64>,
    ) -> Result<Self, PrimitivesError> {
        if factor_names.is_empty() {
            return Err(PrimitivesError::NoFactors);
        }

        let mut seen = HashSet::with_capacity(factor_names.len());
        if let Some(dup) = factor_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(PrimitivesError::DuplicateFactor(dup.to_string()));
        }

        if values.ncols() != factor_names.len() {
            return Err(PrimitivesError::LengthMismatch {
                expected: factor_names.len(),
                actual: values.ncols(),
                context: "factor columns".to_string(),
            });
        }
        if values.nrows() != dates.len() {
            return Err(PrimitivesError::LengthMismatch {
                expected: dates.len(),
                actual: values.nrows(),
                context: "factor rows".to_string(),
            });
        }
        check_dates(&dates)?;

        Ok(Self { dates, factor_names, values })
    }

    /// Create a style factor matrix from named columns.
    ///
    /// # Errors
    /// Returns an error if a column length differs from the date count, or for
    /// any reason [`StyleFactorMatrix::new`] would.
    pub fn from_columns(
        dates: Vec<Date>,
        columns: Vec<(FactorName, Vec<f64>)>,
    ) -> Result<Self, PrimitivesError> {
        let n = dates.len();
        if let Some((name, col)) = columns.iter().find(|(_, col)| col.len() != n) {
            return Err(PrimitivesError::LengthMismatch {
                expected: n,
                actual: col.len(),
                context: format!("factor column {name}"),
            });
        }

        let values = Array2::from_shape_fn((n, columns.len()), |(i, j)| columns[j].1[i]);
        let factor_names = columns.into_iter().map(|(name, _)| name).collect();

        Self::new(dates, factor_names, values)
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of style factors.
    #[must_use]
    pub const fn n_factors(&self) -> usize {
        self.factor_names.len()
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Factor names in column order.
    #[must_use]
    pub fn factor_names(&self) -> &[FactorName] {
        &self.factor_names
    }

    /// The factor return matrix.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// View of rows `start..end`, all factors.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    #[must_use]
    pub fn window(&self, start: usize, end: usize) -> ArrayView2<'_, f64> {
        self.values.slice(s![start..end, ..])
    }

    /// Get the column index for a factor name.
    #[must_use]
    pub fn factor_index(&self, name: &str) -> Option<usize> {
        self.factor_names.iter().position(|n| n.as_str() == name)
    }
}
