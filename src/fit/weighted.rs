//! Weighted absolute-error fit.
//!
//! Objective:
//!
//! ```text
//! f(w) = Σ |b_i| · |(A w)_i − b_i| + γ ‖w‖₁
//! ```
//!
//! Pricing errors are weighted by the size of the target payoff, so regions where
//! the payoff is large dominate the fit.
//!
//! `f` is convex but not smooth, so we use iteratively reweighted least squares
//! (IRLS) on a smoothed majorizer. At iterate `w₀`, each `|x|` term is replaced by
//! `x² / √(x₀² + ε²)`, which turns one step into a weighted ridge problem solved
//! with the shared SVD least squares routine. `ε` starts large and is halved every
//! iteration down to a floor, which walks the smoothed problem toward `f`.
//!
//! We start from the zero vector and keep the best iterate measured on the true
//! objective, so the returned weights never score worse than zero.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::domain::FitMethod;
use crate::error::ApproxError;
use crate::fit::solver::Solver;
use crate::math::{solve_least_squares, stack_penalty};

/// Smallest smoothing, relative to its starting value.
const EPS_FLOOR_REL: f64 = 1e-9;

/// Per-iteration smoothing decay.
const EPS_DECAY: f64 = 0.5;

/// Weighted-error solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSolver {
    pub max_iter: usize,
    pub tol: f64,
}

/// Result of an IRLS run.
#[derive(Debug, Clone)]
pub struct WeightedOutcome {
    pub coef: DVector<f64>,
    pub objective: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl Solver for WeightedSolver {
    fn method(&self) -> FitMethod {
        FitMethod::Weighted
    }

    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>, gamma: f64) -> Result<DVector<f64>, ApproxError> {
        let outcome = minimize_weighted_error(a, b, gamma, self.max_iter, self.tol)?;
        if outcome.converged {
            debug!(
                iterations = outcome.iterations,
                objective = outcome.objective,
                "weighted-error fit converged"
            );
        } else {
            warn!(
                iterations = outcome.iterations,
                objective = outcome.objective,
                "weighted-error fit hit the iteration cap; returning best iterate"
            );
        }
        Ok(outcome.coef)
    }
}

/// `Σ |b_i| · |(A w)_i − b_i| + γ ‖w‖₁`
pub fn weighted_error_objective(a: &DMatrix<f64>, b: &DVector<f64>, w: &DVector<f64>, gamma: f64) -> f64 {
    let pred = a * w;
    let weighted_error: f64 = pred
        .iter()
        .zip(b.iter())
        .map(|(p, bi)| bi.abs() * (p - bi).abs())
        .sum();
    let penalty: f64 = w.iter().map(|v| v.abs()).sum();
    weighted_error + gamma * penalty
}

/// Minimize the weighted-error objective by smoothed IRLS, starting from zero.
pub fn minimize_weighted_error(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    gamma: f64,
    max_iter: usize,
    tol: f64,
) -> Result<WeightedOutcome, ApproxError> {
    let n = a.nrows();
    let p = a.ncols();

    let mut w = DVector::<f64>::zeros(p);
    let mut best = w.clone();
    let mut best_obj = weighted_error_objective(a, b, &w, gamma);

    if p == 0 || n == 0 {
        return Ok(WeightedOutcome {
            coef: best,
            objective: best_obj,
            iterations: 0,
            converged: true,
        });
    }

    let c: Vec<f64> = b.iter().map(|v| v.abs()).collect();
    let eps_r0 = b.amax().max(1.0);
    let eps_w0 = 1.0;
    let mut eps_r = eps_r0;
    let mut eps_w = eps_w0;

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;
        let residual = a * &w - b;

        // sqrt of the per-row IRLS weight c_i / √(r_i² + ε²).
        let sw: Vec<f64> = residual
            .iter()
            .zip(&c)
            .map(|(r, ci)| (ci / (r * r + eps_r * eps_r).sqrt()).sqrt())
            .collect();
        let penalty: Vec<f64> = w
            .iter()
            .map(|wj| gamma / (wj * wj + eps_w * eps_w).sqrt())
            .collect();

        let xw = DMatrix::from_fn(n, p, |i, j| a[(i, j)] * sw[i]);
        let yw = DVector::from_fn(n, |i, _| b[i] * sw[i]);
        let (xs, ys) = stack_penalty(&xw, &yw, &penalty);
        let next = solve_least_squares(&xs, &ys)?;

        let obj = weighted_error_objective(a, b, &next, gamma);
        if obj < best_obj {
            best_obj = obj;
            best = next.clone();
        }

        let step = (&next - &w).amax();
        w = next;

        let smoothing_done = eps_r <= eps_r0 * EPS_FLOOR_REL && eps_w <= eps_w0 * EPS_FLOOR_REL;
        if smoothing_done && step <= tol * (1.0 + w.amax()) {
            converged = true;
            break;
        }

        eps_r = (eps_r * EPS_DECAY).max(eps_r0 * EPS_FLOOR_REL);
        eps_w = (eps_w * EPS_DECAY).max(eps_w0 * EPS_FLOOR_REL);
    }

    Ok(WeightedOutcome {
        coef: best,
        objective: best_obj,
        iterations,
        converged,
    })
}
