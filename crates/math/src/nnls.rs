//! Non-negative least squares.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::{MathError, lstsq};

/// Configuration for [`nnls`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NnlsConfig {
    /// Dual feasibility tolerance. `None` uses
    /// `10 * eps * max(m, n) * max(||A||_1 * ||b||_2, ||A^T b||_inf)`, which
    /// scales with the dual vector so rescaling `A` or `b` does not change the fit.
    pub tolerance: Option<f64>,
    /// Iteration cap on inner solves. `None` uses `3 * n`.
    pub max_iterations: Option<usize>,
}

/// Result of a non-negative least squares solve.
#[derive(Debug, Clone)]
pub struct NnlsResult {
    /// Non-negative solution.
    pub solution: Array1<f64>,
    /// Euclidean norm of `b - A x`.
    pub residual_norm: f64,
    /// Inner iterations performed.
    pub iterations: usize,
}

/// Solve `argmin_x ||A x - b||` subject to `x >= 0` (Lawson–Hanson active set).
///
/// # Arguments
/// * `a` - Design matrix (m x n)
/// * `b` - Target vector (m,)
/// * `config` - Tolerance and iteration cap
///
/// # Errors
/// Returns error if dimensions mismatch, inputs are not finite, or the
/// iteration cap is reached.
pub fn nnls(
    a: ArrayView2<'_, f64>,
    b: ArrayView1<'_, f64>,
    config: &NnlsConfig,
) -> Result<NnlsResult, MathError> {
    let (m, n) = a.dim();
    if b.len() != m {
        return Err(MathError::DimensionMismatch { expected: m, actual: b.len() });
    }
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite NNLS input".to_string()));
    }

    let tol = config.tolerance.unwrap_or_else(|| default_tolerance(a, b));
    let max_iterations = config.max_iterations.unwrap_or(3 * n);

    let mut x = Array1::<f64>::zeros(n);
    let mut passive = vec![false; n];
    // Columns that entered without moving x; cleared once x changes
    let mut blocked = vec![false; n];
    let mut iterations = 0;

    loop {
        // Dual vector: negative gradient of 0.5 * ||Ax - b||^2
        let w = a.t().dot(&(&b - &a.dot(&x)));

        let entering = (0..n)
            .filter(|&j| !passive[j] && !blocked[j] && w[j] > tol)
            .max_by(|&i, &j| w[i].total_cmp(&w[j]));
        let Some(t) = entering else {
            break;
        };
        passive[t] = true;

        loop {
            iterations += 1;
            if iterations > max_iterations {
                return Err(MathError::NotConverged { iterations: max_iterations });
            }

            let z = solve_passive(a, b, &passive)?;

            // The entering column gets no weight: its dual value was rounding noise
            // or it is dependent on the passive set
            if passive[t] && x[t] == 0.0 && z[t] <= 0.0 {
                passive[t] = false;
                blocked[t] = true;
                break;
            }

            if (0..n).filter(|&j| passive[j]).all(|j| z[j] > 0.0) {
                x = z;
                blocked.fill(false);
                break;
            }

            // Step towards z until the first passive coordinate hits zero
            let (alpha, hit) = (0..n)
                .filter(|&j| passive[j] && z[j] <= 0.0)
                .map(|j| {
                    let gap = x[j] - z[j];
                    (if gap > 0.0 { x[j] / gap } else { 0.0 }, j)
                })
                .fold((f64::INFINITY, t), |best, cand| if cand.0 < best.0 { cand } else { best });

            x.zip_mut_with(&z, |xj, &zj| *xj += alpha * (zj - *xj));
            x[hit] = 0.0;
            blocked.fill(false);

            for j in 0..n {
                if passive[j] && x[j] <= 0.0 {
                    passive[j] = false;
                    x[j] = 0.0;
                }
            }
        }
    }

    let residual_norm = (&b - &a.dot(&x)).mapv(|e| e * e).sum().sqrt();

    Ok(NnlsResult { solution: x, residual_norm, iterations })
}

fn default_tolerance(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let (m, n) = a.dim();
    let norm_1 = a
        .axis_iter(Axis(1))
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    let dual_inf = a.t().dot(&b).iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    10.0 * f64::EPSILON * m.max(n) as f64 * (norm_1 * norm_b).max(dual_inf)
}

/// Unconstrained least squares on the passive columns, zero elsewhere.
fn solve_passive(
    a: ArrayView2<'_, f64>,
    b: ArrayView1<'_, f64>,
    passive: &[bool],
) -> Result<Array1<f64>, MathError> {
    let cols: Vec<usize> = (0..passive.len()).filter(|&j| passive[j]).collect();
    let sub = a.select(Axis(1), &cols);
    let fit = lstsq(sub.view(), b)?;

    let mut z = Array1::zeros(passive.len());
    for (k, &j) in cols.iter().enumerate() {
        z[j] = fit.solution[k];
    }
    Ok(z)
}
