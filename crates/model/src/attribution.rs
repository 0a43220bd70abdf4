//! Rolling style attribution results.
//!
//! One row per window, keyed by the date that follows the window, with the
//! fitted exposure or nothing when the window failed.

use ndarray::Array2;
use polars::prelude::*;
use ppe_primitives::{Date, ExposureVector, FactorName};
use ppe_traits::EstimatorError;

/// One window's output row.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionRow {
    /// Date the row is keyed by.
    pub date: Date,
    /// Fitted exposure, `None` when the window failed.
    pub exposure: Option<ExposureVector>,
}

/// A window that could not be fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFailure {
    /// Window index, counting from the first window.
    pub index: usize,
    /// Date the window's row is keyed by.
    pub date: Date,
    /// Why the fit failed.
    pub error: EstimatorError,
}

/// Output of a rolling style attribution run.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionResult {
    factor_names: Vec<FactorName>,
    window: usize,
    rows: Vec<AttributionRow>,
    failures: Vec<WindowFailure>,
}

impl AttributionResult {
    pub(crate) const fn new(
        factor_names: Vec<FactorName>,
        window: usize,
        rows: Vec<AttributionRow>,
        failures: Vec<WindowFailure>,
    ) -> Self {
        Self { factor_names, window, rows, failures }
    }

    /// Factor names, in style matrix column order.
    #[must_use]
    pub fn factor_names(&self) -> &[FactorName] {
        &self.factor_names
    }

    /// Resolved window length in observations.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Output rows in date order.
    #[must_use]
    pub fn rows(&self) -> &[AttributionRow] {
        &self.rows
    }

    /// Windows that failed, in index order.
    #[must_use]
    pub fn failures(&self) -> &[WindowFailure] {
        &self.failures
    }

    /// Number of output rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the run produced no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row dates.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Exposure keyed by `date`, if the row exists and was fitted.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&ExposureVector> {
        self.rows
            .binary_search_by(|r| r.date.cmp(&date))
            .ok()
            .and_then(|i| self.rows[i].exposure.as_ref())
    }

    /// Dense `rows x factors` matrix of weights, NaN for failed windows.
    #[must_use]
    pub fn exposure_matrix(&self) -> Array2<f64> {
        let k = self.factor_names.len();
        let mut out = Array2::from_elem((self.rows.len(), k), f64::NAN);
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(exposure) = &row.exposure {
                out.row_mut(i).assign(exposure.weights());
            }
        }
        out
    }

    /// Convert to a DataFrame with a `date` column and one column per factor.
    ///
    /// Failed windows hold nulls.
    ///
    /// # Errors
    /// Returns error if polars rejects the columns, e.g. a factor named `date`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.factor_names.len() + 1);
        columns.push(Column::new("date".into(), self.dates()));

        for (j, name) in self.factor_names.iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .rows
                .iter()
                .map(|r| r.exposure.as_ref().and_then(|e| e.get(j)))
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        DataFrame::new(columns)
    }

    /// Print the exposure table.
    pub fn print_summary(&self) {
        println!(
            "\n================================================================================"
        );
        println!(
            "RETURNS-BASED STYLE ANALYSIS ({} windows of {} observations)",
            self.rows.len(),
            self.window
        );
        println!(
            "================================================================================"
        );

        print!("{:<12}", "Date");
        for name in &self.factor_names {
            print!(" {:>12}", name.as_str());
        }
        println!();

        for row in &self.rows {
            print!("{:<12}", row.date);
            match &row.exposure {
                Some(exposure) => {
                    for w in exposure.weights() {
                        print!(" {:>11.2}%", w * 100.0);
                    }
                }
                None => {
                    for _ in &self.factor_names {
                        print!(" {:>12}", "-");
                    }
                }
            }
            println!();
        }

        if !self.failures.is_empty() {
            println!(
                "--------------------------------------------------------------------------------"
            );
            println!("FAILED WINDOWS: {}", self.failures.len());
            for failure in &self.failures {
                println!("  #{:<5} {}  {}", failure.index, failure.date, failure.error);
            }
        }
    }
}
