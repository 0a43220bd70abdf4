//! Return series type definitions.

use ndarray::{Array1, ArrayView1, s};

use crate::{Date, PrimitivesError};

/// Checks that a date index is strictly increasing.
pub(crate) fn check_dates(dates: &[Date]) -> Result<(), PrimitivesError> {
    match dates.windows(2).position(|pair| pair[1] <= pair[0]) {
        Some(i) => Err(PrimitivesError::UnorderedDates { position: i + 1 }),
        None => Ok(()),
    }
}

/// A date-indexed series of periodic returns, one observation per date.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<Date>,
    values: Array1<f64>,
}

impl ReturnSeries {
    /// Create a return series.
    ///
    /// # Errors
    /// Returns an error if `dates` and `values` differ in length or the dates are
    /// not strictly increasing.
    pub fn new(dates: Vec<Date>, values: Array1<f64>) -> Result<Self, PrimitivesError> {
        if dates.len() != values.len() {
            return Err(PrimitivesError::LengthMismatch {
                expected: dates.len(),
                actual: values.len(),
                context: "return values".to_string(),
            });
        }
        check_dates(&dates)?;
        Ok(Self { dates, values })
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The return values.
    #[must_use]
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// View of the observations in `start..end`.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    #[must_use]
    pub fn window(&self, start: usize, end: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![start..end])
    }

    /// Get the return on a specific date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i])
    }
}
