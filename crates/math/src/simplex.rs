//! Least squares on the probability simplex.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{MathError, lstsq};

/// Configuration for [`simplex_least_squares`].
#[derive(Debug, Clone, Copy)]
pub struct SimplexLsqConfig {
    /// Step size below which the equality-constrained subproblem counts as solved,
    /// and relative tolerance on negative multipliers.
    pub tolerance: f64,
    /// Maximum number of active-set iterations.
    pub max_iterations: usize,
}

impl Default for SimplexLsqConfig {
    fn default() -> Self {
        Self { tolerance: 1e-10, max_iterations: 500 }
    }
}

/// Result of a simplex-constrained least squares solve.
#[derive(Debug, Clone)]
pub struct SimplexLsqResult {
    /// Weights: non-negative, summing to one.
    pub solution: Array1<f64>,
    /// Euclidean norm of `b - A x`.
    pub residual_norm: f64,
    /// Active-set iterations performed.
    pub iterations: usize,
}

/// Euclidean projection of `v` onto `{x : x >= 0, sum(x) = 1}`.
#[must_use]
pub fn project_simplex(v: ArrayView1<'_, f64>) -> Array1<f64> {
    if v.is_empty() {
        return Array1::zeros(0);
    }

    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumsum = 0.0;
    let mut theta = 0.0;
    for (k, &u) in sorted.iter().enumerate() {
        cumsum += u;
        let t = (cumsum - 1.0) / (k + 1) as f64;
        if u - t > 0.0 {
            theta = t;
        }
    }

    v.mapv(|x| (x - theta).max(0.0))
}

/// Solve `argmin_x ||A x - b||` subject to `x >= 0` and `sum(x) = 1`.
///
/// Primal active-set method on the convex quadratic `0.5 * ||A x - b||^2`,
/// which shares its minimizers with the residual norm. The starting point is
/// the simplex projection of `x0`. Each subproblem keeps the bound weights at
/// zero and eliminates the sum constraint against the last free weight, then
/// solves the reduced least squares problem by pivoted QR, so flat directions
/// (collinear or zero factors) do not break the iteration.
///
/// # Arguments
/// * `a` - Design matrix (m x n)
/// * `b` - Target vector (m,)
/// * `x0` - Starting guess (n,), need not be feasible
/// * `config` - Tolerance and iteration cap
///
/// # Errors
/// Returns error if dimensions mismatch, inputs are not finite, or the
/// iteration cap is reached before the KKT conditions hold.
pub fn simplex_least_squares(
    a: ArrayView2<'_, f64>,
    b: ArrayView1<'_, f64>,
    x0: ArrayView1<'_, f64>,
    config: &SimplexLsqConfig,
) -> Result<SimplexLsqResult, MathError> {
    let (m, n) = a.dim();
    if b.len() != m {
        return Err(MathError::DimensionMismatch { expected: m, actual: b.len() });
    }
    if x0.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x0.len() });
    }
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.iter().chain(b.iter()).chain(x0.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite simplex input".to_string()));
    }

    let mut x = project_simplex(x0);
    // Working set: weights held at zero
    let mut bound: Vec<bool> = x.iter().map(|&w| w == 0.0).collect();
    let mut solved = false;

    for iteration in 0..config.max_iterations {
        let residual = &a.dot(&x) - &b;
        let free: Vec<usize> = (0..n).filter(|&i| !bound[i]).collect();
        if free.is_empty() {
            return Err(MathError::NumericalInstability("no free weights left".to_string()));
        }

        if !solved {
            let step = equality_step(a, &residual, &free)?;
            let step_size = step.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));

            if step_size > config.tolerance {
                // Ratio test against the bounds of the free weights
                let mut alpha = 1.0;
                let mut blocking = None;
                for &i in &free {
                    if step[i] < 0.0 {
                        let ratio = -x[i] / step[i];
                        if ratio < alpha {
                            alpha = ratio;
                            blocking = Some(i);
                        }
                    }
                }

                x.scaled_add(alpha, &step);
                match blocking {
                    Some(i) => {
                        x[i] = 0.0;
                        bound[i] = true;
                    }
                    None => solved = true,
                }
                continue;
            }
        }

        // Multipliers of the bounds: g_i - mu, where mu equalizes the free gradient
        let g = a.t().dot(&residual);
        let mu = free.iter().map(|&i| g[i]).sum::<f64>() / free.len() as f64;
        let scale = g.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(f64::EPSILON);

        let leaving = (0..n)
            .filter(|&i| bound[i])
            .map(|i| (i, g[i] - mu))
            .filter(|&(_, lambda)| lambda < -config.tolerance * scale)
            .min_by(|l, r| l.1.total_cmp(&r.1));

        match leaving {
            Some((i, _)) => {
                bound[i] = false;
                solved = false;
            }
            None => return Ok(finish(a, b, x, iteration + 1)),
        }
    }

    Err(MathError::NotConverged { iterations: config.max_iterations })
}

/// Step `p` minimizing `||A (x + p) - b||` with `p` zero on bound weights and
/// summing to zero over the free ones.
fn equality_step(
    a: ArrayView2<'_, f64>,
    residual: &Array1<f64>,
    free: &[usize],
) -> Result<Array1<f64>, MathError> {
    let (m, n) = a.dim();
    let mut step = Array1::zeros(n);

    let k = free.len();
    if k < 2 {
        return Ok(step);
    }

    // Null-space basis of the sum constraint: e_j - e_last
    let last = free[k - 1];
    let d = Array2::from_shape_fn((m, k - 1), |(r, c)| a[[r, free[c]]] - a[[r, last]]);
    let target = residual.mapv(|e| -e);
    let fit = lstsq(d.view(), target.view())?;

    for (c, &i) in free[..k - 1].iter().enumerate() {
        step[i] = fit.solution[c];
    }
    step[last] = -fit.solution.sum();

    Ok(step)
}

fn finish(
    a: ArrayView2<'_, f64>,
    b: ArrayView1<'_, f64>,
    mut x: Array1<f64>,
    iterations: usize,
) -> SimplexLsqResult {
    x.mapv_inplace(|w| w.max(0.0));
    let total = x.sum();
    if total > 0.0 {
        x /= total;
    }
    let residual_norm = (&b - &a.dot(&x)).mapv(|e| e * e).sum().sqrt();

    SimplexLsqResult { solution: x, residual_norm, iterations }
}
