//! Single-index and market-timing regressions.

use ndarray::{Array1, Array2, ArrayView1};
use ppe_math::ordinary_least_squares;

use crate::ModelError;

/// Single-index (CAPM) regression fit.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleIndexFit {
    /// Jensen's alpha per period.
    pub alpha: f64,
    /// Market beta.
    pub beta: f64,
    /// R-squared.
    pub r_squared: f64,
    /// Residual excess returns.
    pub residuals: Array1<f64>,
}

/// Treynor-Mazuy market-timing regression fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingFit {
    /// Alpha per period.
    pub alpha: f64,
    /// Market beta.
    pub beta: f64,
    /// Timing coefficient on the squared market excess return.
    pub gamma: f64,
    /// R-squared.
    pub r_squared: f64,
    /// Residual excess returns.
    pub residuals: Array1<f64>,
}

fn excess(
    asset: &ArrayView1<'_, f64>,
    market: &ArrayView1<'_, f64>,
    risk_free: &ArrayView1<'_, f64>,
) -> Result<(Array1<f64>, Array1<f64>), ModelError> {
    let n = asset.len();
    if market.len() != n || risk_free.len() != n {
        return Err(ModelError::InvalidInput(format!(
            "series lengths differ: asset {n}, market {}, risk-free {}",
            market.len(),
            risk_free.len()
        )));
    }
    Ok((asset - risk_free, market - risk_free))
}

fn require_observations(n: usize, params: usize) -> Result<(), ModelError> {
    if n <= params {
        return Err(ModelError::InvalidInput(format!(
            "{n} observations cannot identify {params} coefficients"
        )));
    }
    Ok(())
}

/// Regress asset excess returns on market excess returns.
///
/// Fits `asset - rf = alpha + beta * (market - rf) + e` by OLS.
///
/// # Errors
/// Returns error if lengths differ, there are no more observations than
/// coefficients, or the market excess return is constant.
pub fn single_index(
    asset: ArrayView1<'_, f64>,
    market: ArrayView1<'_, f64>,
    risk_free: ArrayView1<'_, f64>,
) -> Result<SingleIndexFit, ModelError> {
    let (y, mkt) = excess(&asset, &market, &risk_free)?;
    let n = y.len();
    require_observations(n, 2)?;

    let x = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { 1.0 } else { mkt[i] });
    let ols = ordinary_least_squares(y.view(), x.view())?;

    Ok(SingleIndexFit {
        alpha: ols.coefficients[0],
        beta: ols.coefficients[1],
        r_squared: ols.r_squared,
        residuals: ols.residuals,
    })
}

/// Treynor-Mazuy regression with a quadratic market term.
///
/// Fits `asset - rf = alpha + beta * (market - rf) + gamma * (market - rf)^2 + e`.
/// A positive `gamma` indicates market-timing skill.
///
/// # Errors
/// Returns error if lengths differ, there are no more observations than
/// coefficients, or the design matrix is rank deficient.
pub fn treynor_mazuy(
    asset: ArrayView1<'_, f64>,
    market: ArrayView1<'_, f64>,
    risk_free: ArrayView1<'_, f64>,
) -> Result<TimingFit, ModelError> {
    let (y, mkt) = excess(&asset, &market, &risk_free)?;
    let n = y.len();
    require_observations(n, 3)?;

    let x = Array2::from_shape_fn((n, 3), |(i, j)| match j {
        0 => 1.0,
        1 => mkt[i],
        _ => mkt[i] * mkt[i],
    });
    let ols = ordinary_least_squares(y.view(), x.view())?;

    Ok(TimingFit {
        alpha: ols.coefficients[0],
        beta: ols.coefficients[1],
        gamma: ols.coefficients[2],
        r_squared: ols.r_squared,
        residuals: ols.residuals,
    })
}
