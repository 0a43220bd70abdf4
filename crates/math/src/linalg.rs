//! Linear least squares.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

use crate::MathError;

/// Result of a rank-revealing least squares solve.
#[derive(Debug, Clone)]
pub struct LstsqResult {
    /// Basic solution: coefficients of columns outside the numerical rank are zero.
    pub solution: Array1<f64>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
    /// Euclidean norm of `b - A x`.
    pub residual_norm: f64,
}

/// Result of an ordinary least squares regression.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients.
    pub coefficients: Array1<f64>,
    /// Residuals.
    pub residuals: Array1<f64>,
    /// R-squared.
    pub r_squared: f64,
}

/// Solve `argmin_x ||A x - b||` by Householder QR with column pivoting.
///
/// Columns whose remaining norm falls below `max(m, n) * eps * max_col_norm`
/// are treated as dependent and get a zero coefficient, so rank-deficient
/// systems return a basic solution instead of failing.
///
/// # Errors
/// Returns error if dimensions mismatch or the input contains NaN/Inf.
pub fn lstsq(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Result<LstsqResult, MathError> {
    let (m, n) = a.dim();
    if b.len() != m {
        return Err(MathError::DimensionMismatch { expected: m, actual: b.len() });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite least squares input".to_string()));
    }

    let mut r: Array2<f64> = a.to_owned();
    let mut qtb: Array1<f64> = b.to_owned();
    let mut perm: Vec<usize> = (0..n).collect();

    let max_norm = (0..n).map(|j| column_norm(&r, 0, j)).fold(0.0, f64::max);
    let tol = m.max(n) as f64 * f64::EPSILON * max_norm;

    let mut rank = 0;
    for k in 0..m.min(n) {
        // Pivot on the column with the largest remaining norm
        let (pivot, norm) = (k..n)
            .map(|j| (j, column_norm(&r, k, j)))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if norm <= tol {
            break;
        }

        if pivot != k {
            for i in 0..m {
                r.swap([i, k], [i, pivot]);
            }
            perm.swap(k, pivot);
        }

        // Householder reflector zeroing r[k+1.., k]
        let mut v = r.slice(s![k.., k]).to_owned();
        let alpha = if v[0] >= 0.0 { -norm } else { norm };
        v[0] -= alpha;
        let v_norm_sq = v.dot(&v);

        if v_norm_sq > 0.0 {
            for j in k..n {
                let f = 2.0 * v.dot(&r.slice(s![k.., j])) / v_norm_sq;
                r.slice_mut(s![k.., j]).scaled_add(-f, &v);
            }
            let f = 2.0 * v.dot(&qtb.slice(s![k..])) / v_norm_sq;
            qtb.slice_mut(s![k..]).scaled_add(-f, &v);
        }

        rank += 1;
    }

    // Back substitution on the leading rank x rank triangle
    let mut z = Array1::<f64>::zeros(n);
    for i in (0..rank).rev() {
        let mut sum = qtb[i];
        for j in (i + 1)..rank {
            sum -= r[[i, j]] * z[j];
        }
        z[i] = sum / r[[i, i]];
    }

    let mut solution = Array1::zeros(n);
    for (k, &col) in perm.iter().enumerate() {
        solution[col] = z[k];
    }

    let residual_norm = (&b - &a.dot(&solution)).mapv(|e| e * e).sum().sqrt();

    Ok(LstsqResult { solution, rank, residual_norm })
}

fn column_norm(m: &Array2<f64>, from_row: usize, col: usize) -> f64 {
    let c = m.slice(s![from_row.., col]);
    c.dot(&c).sqrt()
}

/// Perform ordinary least squares regression.
///
/// Solves: argmin_beta sum((y_i - X_i * beta)^2)
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x p), including an intercept column if one is wanted
///
/// # Returns
/// OLS result with coefficients, residuals and R-squared.
///
/// # Errors
/// Returns error if dimensions mismatch, there are fewer observations than
/// columns, or the design matrix is rank deficient.
pub fn ordinary_least_squares(
    y: ArrayView1<'_, f64>,
    x: ArrayView2<'_, f64>,
) -> Result<OlsResult, MathError> {
    let n = y.len();
    let p = x.ncols();

    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n < p {
        return Err(MathError::InsufficientData { required: p, actual: n });
    }

    let fit = lstsq(x, y)?;
    if fit.rank < p {
        return Err(MathError::RankDeficient { rank: fit.rank, columns: p });
    }

    let coefficients = fit.solution;
    let residuals = &y - &x.dot(&coefficients);

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(OlsResult { coefficients, residuals, r_squared })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn ols_simple_regression() {
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let x =
            Array2::from_shape_vec((5, 2), vec![1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0, 5.0])
                .unwrap();

        let result = ordinary_least_squares(y.view(), x.view()).unwrap();

        // Perfect fit: y = 0 + 1*x
        assert_relative_eq!(result.coefficients[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn ols_noisy_regression() {
        let y = array![1.1, 1.9, 3.2, 3.8, 5.1];
        let x =
            Array2::from_shape_vec((5, 2), vec![1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0, 5.0])
                .unwrap();

        let result = ordinary_least_squares(y.view(), x.view()).unwrap();

        // Closed form: slope = Sxy / Sxx = 9.9 / 10
        assert_relative_eq!(result.coefficients[1], 0.99, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[0], 0.05, epsilon = 1e-10);
        assert_relative_eq!(result.residuals.sum(), 0.0, epsilon = 1e-10);
        assert!(result.r_squared > 0.98 && result.r_squared < 1.0);
    }

    #[test]
    fn ols_rejects_collinear_design() {
        let y = array![1.0, 2.0, 3.0];
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0]).unwrap();

        let err = ordinary_least_squares(y.view(), x.view()).unwrap_err();
        assert_eq!(err, MathError::RankDeficient { rank: 1, columns: 2 });
    }

    #[test]
    fn ols_too_few_observations() {
        let y = array![1.0];
        let x = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();

        let err = ordinary_least_squares(y.view(), x.view()).unwrap_err();
        assert_eq!(err, MathError::InsufficientData { required: 2, actual: 1 });
    }

    #[test]
    fn lstsq_overdetermined() {
        let a = Array2::from_shape_vec((4, 2), vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0])
            .unwrap();
        let x_true = array![0.3, -0.7];
        let b = a.dot(&x_true);

        let fit = lstsq(a.view(), b.view()).unwrap();

        assert_eq!(fit.rank, 2);
        assert_relative_eq!(fit.solution[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(fit.solution[1], -0.7, epsilon = 1e-12);
        assert_relative_eq!(fit.residual_norm, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn lstsq_duplicate_columns_basic_solution() {
        let a = Array2::from_shape_vec((3, 2), vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]).unwrap();
        let b = array![2.0, 4.0, 6.0];

        let fit = lstsq(a.view(), b.view()).unwrap();

        assert_eq!(fit.rank, 1);
        assert_relative_eq!(fit.residual_norm, 0.0, epsilon = 1e-12);
        let fitted = a.dot(&fit.solution);
        for (f, target) in fitted.iter().zip(b.iter()) {
            assert_relative_eq!(*f, *target, epsilon = 1e-12);
        }
    }

    #[test]
    fn lstsq_zero_matrix() {
        let a = Array2::<f64>::zeros((3, 2));
        let b = array![1.0, 2.0, 3.0];

        let fit = lstsq(a.view(), b.view()).unwrap();

        assert_eq!(fit.rank, 0);
        assert!(fit.solution.iter().all(|&x| x == 0.0));
        assert_relative_eq!(fit.residual_norm, 14.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn lstsq_rejects_nan() {
        let a = Array2::from_shape_vec((2, 1), vec![1.0, f64::NAN]).unwrap();
        let b = array![1.0, 2.0];
        assert!(matches!(
            lstsq(a.view(), b.view()),
            Err(MathError::NumericalInstability(_))
        ));
    }
}
