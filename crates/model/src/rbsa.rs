//! Rolling returns-based style analysis.

use ndarray::Array1;
use ppe_primitives::{ExposureVector, ReturnSeries, StyleFactorMatrix};
use ppe_traits::{EstimatorError, StyleEstimator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    AttributionResult, AttributionRow, FailurePolicy, ModelError, SimplexStyleEstimator, Window,
    WindowFailure,
};

/// Configuration for a rolling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingConfig {
    /// What to do with windows that cannot be fitted.
    pub failure_policy: FailurePolicy,
    /// Fit windows on the rayon pool. Needs the `parallel` feature.
    pub parallel: bool,
}

/// Rolling returns-based style analysis.
///
/// Slides a fixed-length window over a fund's returns and the matching style
/// factor returns and fits style weights in each window with the estimator
/// `E`. Window `i` fits observations `i .. i + window - 1` (one fewer than
/// the window length) and its row is keyed by the date at `i + window`, so a
/// series of `L` observations yields `L - window` rows.
#[derive(Debug, Clone)]
pub struct RollingStyleAttribution<E = SimplexStyleEstimator> {
    estimator: E,
    config: RollingConfig,
}

impl RollingStyleAttribution {
    /// Create a new analysis with the simplex estimator and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RollingConfig::default())
    }

    /// Create a new analysis with the simplex estimator and custom configuration.
    #[must_use]
    pub fn with_config(config: RollingConfig) -> Self {
        Self::with_estimator(SimplexStyleEstimator::new(), config)
    }
}

impl Default for RollingStyleAttribution {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StyleEstimator> RollingStyleAttribution<E> {
    /// Create a new analysis around a custom estimator.
    #[must_use]
    pub const fn with_estimator(estimator: E, config: RollingConfig) -> Self {
        Self { estimator, config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RollingConfig {
        &self.config
    }

    /// Get the estimator.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Run the analysis.
    ///
    /// # Arguments
    /// * `returns` - Fund returns (L,)
    /// * `styles` - Style factor returns on the same dates (L x K)
    /// * `window` - Observation count or period code
    ///
    /// # Returns
    /// One row per window in date order, plus the failed windows.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidInput` if the inputs are not date-aligned or
    /// the window cannot be resolved to `2..=L` observations, before any window
    /// is fitted. With [`FailurePolicy::Abort`], returns
    /// `ModelError::NumericalFailure` for the earliest window that fails.
    pub fn run(
        &self,
        returns: &ReturnSeries,
        styles: &StyleFactorMatrix,
        window: impl Into<Window>,
    ) -> Result<AttributionResult, ModelError> {
        let window = window.into();
        validate_alignment(returns, styles)?;
        let w = resolve_window(window, returns.len())?;
        let n_windows = returns.len() - w;

        info!(
            estimator = self.estimator.name(),
            observations = returns.len(),
            factors = styles.n_factors(),
            window = w,
            windows = n_windows,
            policy = %self.config.failure_policy,
            "starting rolling style analysis"
        );

        let result = if self.config.parallel {
            self.run_parallel(returns, styles, w, n_windows)?
        } else {
            let fits = (0..n_windows).map(|i| self.fit_window(returns, styles, i, w));
            self.assemble(styles, w, fits)?
        };

        info!(
            rows = result.len(),
            failed = result.failures().len(),
            "rolling style analysis finished"
        );

        Ok(result)
    }

    fn fit_window(
        &self,
        returns: &ReturnSeries,
        styles: &StyleFactorMatrix,
        index: usize,
        w: usize,
    ) -> Result<Array1<f64>, EstimatorError> {
        let (start, end) = (index, index + w - 1);
        self.estimator.estimate_window(returns.window(start, end), styles.window(start, end))
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(
        &self,
        returns: &ReturnSeries,
        styles: &StyleFactorMatrix,
        w: usize,
        n_windows: usize,
    ) -> Result<AttributionResult, ModelError> {
        use rayon::prelude::*;

        // Indexed collect keeps window order
        let fits: Vec<_> = (0..n_windows)
            .into_par_iter()
            .map(|i| self.fit_window(returns, styles, i, w))
            .collect();
        self.assemble(styles, w, fits)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(
        &self,
        returns: &ReturnSeries,
        styles: &StyleFactorMatrix,
        w: usize,
        n_windows: usize,
    ) -> Result<AttributionResult, ModelError> {
        warn!("parallel fitting requested without the `parallel` feature, fitting serially");
        let fits = (0..n_windows).map(|i| self.fit_window(returns, styles, i, w));
        self.assemble(styles, w, fits)
    }

    fn assemble(
        &self,
        styles: &StyleFactorMatrix,
        w: usize,
        fits: impl IntoIterator<Item = Result<Array1<f64>, EstimatorError>>,
    ) -> Result<AttributionResult, ModelError> {
        let dates = styles.dates();
        let mut rows = Vec::with_capacity(dates.len().saturating_sub(w));
        let mut failures = Vec::new();

        for (index, fit) in fits.into_iter().enumerate() {
            let date = dates[index + w];
            let exposure = fit.and_then(|weights| {
                ExposureVector::new(weights)
                    .map_err(|e| EstimatorError::InvalidWeights(e.to_string()))
            });
            match exposure {
                Ok(exposure) => {
                    debug!(index, %date, weights = ?exposure.weights().as_slice(), "fitted window");
                    rows.push(AttributionRow { date, exposure: Some(exposure) });
                }
                Err(error) => {
                    warn!(index, %date, %error, "window fit failed");
                    match self.config.failure_policy {
                        FailurePolicy::Abort => {
                            return Err(ModelError::NumericalFailure { index, date, source: error });
                        }
                        FailurePolicy::Skip => {}
                        FailurePolicy::Fill => rows.push(AttributionRow { date, exposure: None }),
                    }
                    failures.push(WindowFailure { index, date, error });
                }
            }
        }

        Ok(AttributionResult::new(styles.factor_names().to_vec(), w, rows, failures))
    }
}

fn validate_alignment(
    returns: &ReturnSeries,
    styles: &StyleFactorMatrix,
) -> Result<(), ModelError> {
    if returns.len() != styles.len() {
        return Err(ModelError::InvalidInput(format!(
            "returns have {} observations but styles have {}",
            returns.len(),
            styles.len()
        )));
    }
    if let Some(pos) = returns.dates().iter().zip(styles.dates()).position(|(a, b)| a != b) {
        return Err(ModelError::InvalidInput(format!(
            "dates differ at position {pos}: returns {} vs styles {}",
            returns.dates()[pos],
            styles.dates()[pos]
        )));
    }
    Ok(())
}

fn resolve_window(window: Window, len: usize) -> Result<usize, ModelError> {
    let w = window.resolve().ok_or_else(|| {
        ModelError::InvalidInput(format!("period {window} has no trading-day window length"))
    })?;
    if w < 2 {
        return Err(ModelError::InvalidInput(format!(
            "window of {w} observations is shorter than 2"
        )));
    }
    if w > len {
        return Err(ModelError::InvalidInput(format!(
            "window of {w} observations exceeds the {len} available"
        )));
    }
    Ok(w)
}
