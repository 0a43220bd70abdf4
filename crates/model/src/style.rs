//! Single-window style estimators.

use ndarray::{Array1, ArrayView1, ArrayView2};
use ppe_math::{
    MathError, NnlsConfig, SimplexLsqConfig, nnls, project_simplex, simplex_least_squares,
};
use ppe_traits::{EstimatorError, StyleEstimator};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Solver settings shared by the style estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Convergence tolerance of the constrained solve.
    pub tolerance: f64,
    /// Iteration cap of the constrained solve.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { tolerance: 1e-10, max_iterations: 500 }
    }
}

fn validate_window(
    returns: &ArrayView1<'_, f64>,
    styles: &ArrayView2<'_, f64>,
) -> Result<(), EstimatorError> {
    if styles.nrows() != returns.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: returns.len(),
            actual: styles.nrows(),
            context: "style rows".to_string(),
        });
    }
    if styles.ncols() == 0 {
        return Err(EstimatorError::InsufficientData { required: 1, actual: 0 });
    }
    if returns.is_empty() {
        return Err(EstimatorError::InsufficientData { required: 1, actual: 0 });
    }
    if returns.iter().any(|v| !v.is_finite()) {
        return Err(EstimatorError::NonFiniteInput("returns window".to_string()));
    }
    if styles.iter().any(|v| !v.is_finite()) {
        return Err(EstimatorError::NonFiniteInput("styles window".to_string()));
    }
    Ok(())
}

fn solver_error(err: MathError) -> EstimatorError {
    match err {
        MathError::NotConverged { iterations } => EstimatorError::NotConverged { iterations },
        MathError::RankDeficient { rank, columns } => {
            EstimatorError::RankDeficient { rank, columns }
        }
        MathError::InsufficientData { required, actual } => {
            EstimatorError::InsufficientData { required, actual }
        }
        MathError::NumericalInstability(msg) => EstimatorError::NonFiniteInput(msg),
        other => EstimatorError::LinearAlgebra(other.to_string()),
    }
}

fn check_finite(weights: Array1<f64>) -> Result<Array1<f64>, EstimatorError> {
    if weights.iter().all(|w| w.is_finite()) {
        Ok(weights)
    } else {
        Err(EstimatorError::NonFiniteInput("fitted weights".to_string()))
    }
}

/// Constrained style estimator: weights are non-negative and sum to one.
///
/// A non-negative least squares fit seeds the solve; the seed is projected
/// onto the simplex and refined with an active-set method until the KKT
/// conditions of `min ||S w - r||` over the simplex hold.
#[derive(Debug, Clone, Default)]
pub struct SimplexStyleEstimator {
    config: SolverConfig,
}

impl SimplexStyleEstimator {
    /// Create a new estimator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl StyleEstimator for SimplexStyleEstimator {
    type Config = SolverConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn name(&self) -> &str {
        "simplex"
    }

    fn estimate_window(
        &self,
        returns: ArrayView1<'_, f64>,
        styles: ArrayView2<'_, f64>,
    ) -> Result<Array1<f64>, EstimatorError> {
        validate_window(&returns, &styles)?;

        // The seed only picks a starting point; fall back to equal weights
        let start = match nnls(styles, returns, &NnlsConfig::default()) {
            Ok(seed) => project_simplex(seed.solution.view()),
            Err(e) => {
                debug!(error = %e, "nnls seed failed, starting from equal weights");
                Array1::from_elem(styles.ncols(), 1.0 / styles.ncols() as f64)
            }
        };

        let config = SimplexLsqConfig {
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
        };
        let fit =
            simplex_least_squares(styles, returns, start.view(), &config).map_err(solver_error)?;

        check_finite(fit.solution)
    }
}

/// Long-only style estimator without the budget constraint.
///
/// Weights are non-negative but need not sum to one, the first stage of
/// [`SimplexStyleEstimator`] on its own. A rolling run records windows whose
/// weights do not sum to one as failures.
#[derive(Debug, Clone, Default)]
pub struct NonNegativeStyleEstimator {
    config: SolverConfig,
}

impl NonNegativeStyleEstimator {
    /// Create a new estimator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }
}

impl StyleEstimator for NonNegativeStyleEstimator {
    type Config = SolverConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn name(&self) -> &str {
        "nnls"
    }

    fn estimate_window(
        &self,
        returns: ArrayView1<'_, f64>,
        styles: ArrayView2<'_, f64>,
    ) -> Result<Array1<f64>, EstimatorError> {
        validate_window(&returns, &styles)?;

        let config = NnlsConfig { tolerance: None, max_iterations: Some(self.config.max_iterations) };
        let fit = nnls(styles, returns, &config).map_err(solver_error)?;

        check_finite(fit.solution)
    }
}
