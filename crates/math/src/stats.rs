//! Return and risk statistics on price or return series.
//!
//! Dispersion statistics use `ddof` the way sample estimators do: the
//! divisor is `n - ddof`, and a series of `ddof` or fewer observations has
//! no estimate.

use ndarray::{Array1, ArrayView1};

use crate::MathError;

fn check_same_len(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> Result<(), MathError> {
    if x.len() != y.len() {
        return Err(MathError::DimensionMismatch { expected: x.len(), actual: y.len() });
    }
    Ok(())
}

/// Variance of `x` with divisor `n - ddof`.
///
/// # Errors
/// Returns error if `x` has `ddof` or fewer observations.
pub fn variance(x: ArrayView1<'_, f64>, ddof: usize) -> Result<f64, MathError> {
    let n = x.len();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if n <= ddof {
        return Err(MathError::InsufficientData { required: ddof + 1, actual: n });
    }

    let mean = x.sum() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(ss / (n - ddof) as f64)
}

/// Standard deviation of `x` with divisor `n - ddof`.
///
/// # Errors
/// Returns error if `x` has `ddof` or fewer observations.
pub fn std_dev(x: ArrayView1<'_, f64>, ddof: usize) -> Result<f64, MathError> {
    variance(x, ddof).map(f64::sqrt)
}

/// Sample standard deviation scaled by `sqrt(periods_per_year)`.
///
/// # Arguments
/// * `x` - Periodic returns
/// * `periods_per_year` - Observation frequency, e.g. 12 for monthly returns
///
/// # Errors
/// Returns error if `periods_per_year` is zero or `x` has fewer than two observations.
pub fn annualized_std(x: ArrayView1<'_, f64>, periods_per_year: u32) -> Result<f64, MathError> {
    if periods_per_year == 0 {
        return Err(MathError::InvalidParameter("periods_per_year must be positive".to_string()));
    }
    Ok(std_dev(x, 1)? * f64::from(periods_per_year).sqrt())
}

/// Sample covariance (divisor `n - 1`).
///
/// # Errors
/// Returns error if lengths differ or there are fewer than two observations.
pub fn covariance(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    check_same_len(&x, &y)?;
    let n = x.len();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if n < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: n });
    }

    let mx = x.sum() / n as f64;
    let my = y.sum() / n as f64;
    let s: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(s / (n - 1) as f64)
}

/// Pearson correlation coefficient.
///
/// # Errors
/// Returns error if lengths differ, there are fewer than two observations,
/// or either series is constant.
pub fn correlation(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    let cov = covariance(x, y)?;
    let denom = std_dev(x, 1)? * std_dev(y, 1)?;
    if denom == 0.0 {
        return Err(MathError::NumericalInstability("correlation of a constant series".to_string()));
    }
    Ok(cov / denom)
}

/// Coefficient of determination of a simple linear fit, the squared correlation.
///
/// # Errors
/// See [`correlation`].
pub fn r_squared(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    correlation(x, y).map(|c| c * c)
}

/// Elements strictly above `line`, in order.
#[must_use]
pub fn upside(x: ArrayView1<'_, f64>, line: f64) -> Array1<f64> {
    x.iter().copied().filter(|&v| v > line).collect()
}

/// Elements strictly below `line`, in order.
#[must_use]
pub fn downside(x: ArrayView1<'_, f64>, line: f64) -> Array1<f64> {
    x.iter().copied().filter(|&v| v < line).collect()
}

/// Annualized standard deviation of the observations above `line`.
///
/// # Errors
/// Returns error if fewer than two observations lie above `line`.
pub fn upside_std(
    x: ArrayView1<'_, f64>,
    periods_per_year: u32,
    line: f64,
) -> Result<f64, MathError> {
    annualized_std(upside(x, line).view(), periods_per_year)
}

/// Annualized standard deviation of the observations below `line`.
///
/// # Errors
/// Returns error if fewer than two observations lie below `line`.
pub fn downside_std(
    x: ArrayView1<'_, f64>,
    periods_per_year: u32,
    line: f64,
) -> Result<f64, MathError> {
    annualized_std(downside(x, line).view(), periods_per_year)
}

/// Rescale a price series so that it starts at `base`.
///
/// # Errors
/// Returns error if `x` is empty, `base` is zero, or the first value is zero.
pub fn rebase(x: ArrayView1<'_, f64>, base: f64) -> Result<Array1<f64>, MathError> {
    let Some(&first) = x.first() else {
        return Err(MathError::EmptyData);
    };
    if base == 0.0 {
        return Err(MathError::InvalidParameter("rebase base must be non-zero".to_string()));
    }
    if first == 0.0 {
        return Err(MathError::InvalidParameter("cannot rebase a series starting at zero".to_string()));
    }
    Ok(x.mapv(|v| v / first * base))
}

fn check_prices(prices: &ArrayView1<'_, f64>) -> Result<(), MathError> {
    if prices.len() < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: prices.len() });
    }
    if let Some(p) = prices.iter().find(|&&p| p <= 0.0 || p.is_nan()) {
        return Err(MathError::InvalidParameter(format!("prices must be positive, got {p}")));
    }
    Ok(())
}

/// Simple returns `p[t] / p[t-1] - 1`; one element shorter than `prices`.
///
/// Negative and zero prices are allowed except as a divisor.
///
/// # Errors
/// Returns error if there are fewer than two prices or a price other than the
/// last is zero.
pub fn simple_returns(prices: ArrayView1<'_, f64>) -> Result<Array1<f64>, MathError> {
    if prices.len() < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: prices.len() });
    }
    if let Some(t) = prices.iter().take(prices.len() - 1).position(|&p| p == 0.0) {
        return Err(MathError::InvalidParameter(format!("zero price at {t} divides a return")));
    }
    Ok(prices.windows(2).into_iter().map(|w| w[1] / w[0] - 1.0).collect())
}

/// Log returns `ln(p[t]) - ln(p[t-1])`; one element shorter than `prices`.
///
/// # Errors
/// Returns error if there are fewer than two prices or any price is not positive.
pub fn log_returns(prices: ArrayView1<'_, f64>) -> Result<Array1<f64>, MathError> {
    check_prices(&prices)?;
    Ok(prices.windows(2).into_iter().map(|w| w[1].ln() - w[0].ln()).collect())
}

/// Drawdown series `p[t] / max(p[..=t]) - 1`.
///
/// # Errors
/// Returns error if `prices` is empty or contains a non-positive price.
pub fn drawdown(prices: ArrayView1<'_, f64>) -> Result<Array1<f64>, MathError> {
    if prices.is_empty() {
        return Err(MathError::EmptyData);
    }
    if let Some(p) = prices.iter().find(|&&p| p <= 0.0 || p.is_nan()) {
        return Err(MathError::InvalidParameter(format!("prices must be positive, got {p}")));
    }

    let mut running_max = f64::NEG_INFINITY;
    Ok(prices
        .iter()
        .map(|&p| {
            running_max = running_max.max(p);
            p / running_max - 1.0
        })
        .collect())
}

/// Deepest drawdown, a non-positive number.
///
/// # Errors
/// See [`drawdown`].
pub fn max_drawdown(prices: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    Ok(drawdown(prices)?.fold(0.0, |acc: f64, &d| acc.min(d)))
}

/// Beta of `asset` against `market`: `cov(asset, market) / var(market)`.
///
/// # Errors
/// Returns error if lengths differ, there are fewer than two observations,
/// or the market series is constant.
pub fn beta(asset: ArrayView1<'_, f64>, market: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    let cov = covariance(asset, market)?;
    let var = variance(market, 1)?;
    if var == 0.0 {
        return Err(MathError::NumericalInstability("beta against a constant market".to_string()));
    }
    Ok(cov / var)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1.25)]
    #[case(1, 5.0 / 3.0)]
    fn variance_ddof(#[case] ddof: usize, #[case] expected: f64) {
        let x = array![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(variance(x.view(), ddof).unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(std_dev(x.view(), ddof).unwrap(), expected.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn variance_needs_more_than_ddof() {
        let x = array![1.0];
        assert_eq!(
            variance(x.view(), 1).unwrap_err(),
            MathError::InsufficientData { required: 2, actual: 1 }
        );
        assert_eq!(variance(Array1::<f64>::zeros(0).view(), 0).unwrap_err(), MathError::EmptyData);
    }

    #[test]
    fn annualized_std_scales_by_root_periods() {
        let x = array![0.01, -0.02, 0.015, 0.005];
        let sd = std_dev(x.view(), 1).unwrap();
        assert_relative_eq!(annualized_std(x.view(), 12).unwrap(), sd * 12.0_f64.sqrt());
        assert!(annualized_std(x.view(), 0).is_err());
    }

    #[test]
    fn covariance_and_correlation() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(covariance(x.view(), y.view()).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(correlation(x.view(), y.view()).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r_squared(x.view(), (-&y).view()).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn correlation_of_constant_series_fails() {
        let x = array![1.0, 1.0, 1.0];
        let y = array![1.0, 2.0, 3.0];
        assert!(matches!(
            correlation(x.view(), y.view()),
            Err(MathError::NumericalInstability(_))
        ));
    }

    #[test]
    fn covariance_length_mismatch() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 2.0];
        assert_eq!(
            covariance(x.view(), y.view()).unwrap_err(),
            MathError::DimensionMismatch { expected: 3, actual: 2 }
        );
    }

    #[test]
    fn upside_downside_are_strict() {
        let x = array![0.02, 0.0, -0.01, 0.03, -0.02];
        assert_eq!(upside(x.view(), 0.0), array![0.02, 0.03]);
        assert_eq!(downside(x.view(), 0.0), array![-0.01, -0.02]);
        assert_eq!(upside(x.view(), 0.02), array![0.03]);
    }

    #[test]
    fn downside_std_uses_filtered_subset() {
        let x = array![0.02, -0.01, 0.03, -0.03, 0.01];
        let expected = annualized_std(array![-0.01, -0.03].view(), 12).unwrap();
        assert_relative_eq!(downside_std(x.view(), 12, 0.0).unwrap(), expected);
        assert!(upside_std(array![0.01, -0.02].view(), 12, 0.0).is_err());
    }

    #[test]
    fn rebase_starts_at_base() {
        let x = array![50.0, 55.0, 45.0];
        let r = rebase(x.view(), 100.0).unwrap();
        assert_relative_eq!(r[0], 100.0);
        assert_relative_eq!(r[1], 110.0, epsilon = 1e-12);
        assert_relative_eq!(r[2], 90.0, epsilon = 1e-12);

        assert!(rebase(x.view(), 0.0).is_err());
        assert!(rebase(array![0.0, 1.0].view(), 100.0).is_err());
    }

    #[test]
    fn simple_and_log_returns() {
        let p = array![100.0, 110.0, 99.0];
        let simple = simple_returns(p.view()).unwrap();
        assert_eq!(simple.len(), 2);
        assert_relative_eq!(simple[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(simple[1], -0.1, epsilon = 1e-12);

        let log = log_returns(p.view()).unwrap();
        assert_relative_eq!(log[0], 1.1_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(log[1], 0.9_f64.ln(), epsilon = 1e-12);

        assert!(log_returns(array![100.0, -1.0].view()).is_err());
        assert!(simple_returns(array![100.0].view()).is_err());
    }

    #[test]
    fn simple_returns_only_need_nonzero_divisors() {
        // Spread or P&L series can cross zero
        let p = array![-2.0, -1.0, 0.0];
        let simple = simple_returns(p.view()).unwrap();
        assert_relative_eq!(simple[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(simple[1], -1.0, epsilon = 1e-12);

        assert!(matches!(
            simple_returns(array![1.0, 0.0, 2.0].view()),
            Err(MathError::InvalidParameter(_))
        ));
        assert!(log_returns(p.view()).is_err());
        assert!(drawdown(array![1.0, 0.0].view()).is_err());
    }

    #[test]
    fn drawdown_series() {
        let p = array![100.0, 120.0, 90.0, 130.0, 104.0];
        let dd = drawdown(p.view()).unwrap();
        assert_relative_eq!(dd[0], 0.0);
        assert_relative_eq!(dd[1], 0.0);
        assert_relative_eq!(dd[2], -0.25, epsilon = 1e-12);
        assert_relative_eq!(dd[3], 0.0);
        assert_relative_eq!(dd[4], -0.2, epsilon = 1e-12);
        assert_relative_eq!(max_drawdown(p.view()).unwrap(), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_of_rising_prices_is_zero() {
        let p = array![1.0, 2.0, 3.0];
        assert_eq!(max_drawdown(p.view()).unwrap(), 0.0);
    }

    #[test]
    fn beta_of_levered_asset() {
        let market = array![0.01, -0.02, 0.03, 0.0, 0.015];
        let asset = market.mapv(|m| 0.001 + 1.5 * m);
        assert_relative_eq!(beta(asset.view(), market.view()).unwrap(), 1.5, epsilon = 1e-12);
    }
}
