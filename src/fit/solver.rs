//! Fitting engine: one contract, three objectives.
//!
//! Every solver maps `(A, b, γ)` to a weight vector with one entry per column of
//! `A`. The design matrix assembler never needs to know which solver runs.
//!
//! - `L2Solver`: ridge, closed form via a stacked least squares system
//! - `L1Solver`: lasso, coordinate descent (see `lasso`)
//! - `WeightedSolver`: target-magnitude weighted absolute error (see `weighted`)

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{FitMethod, SolverOptions};
use crate::error::ApproxError;
use crate::fit::lasso::L1Solver;
use crate::fit::weighted::WeightedSolver;
use crate::math::{solve_least_squares, stack_penalty};

/// A fitting strategy.
pub trait Solver: Send + Sync {
    fn method(&self) -> FitMethod;

    /// Solve for weights. `gamma` has already been validated as finite and `>= 0`.
    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>, gamma: f64) -> Result<DVector<f64>, ApproxError>;
}

/// Tikhonov-regularized least squares: `‖Aw − b‖² + γ‖w‖²`.
///
/// Solved as `[A; √γ I] w = [b; 0]`, which has the same minimizer as the
/// regularized normal equations `(AᵀA + γI) w = Aᵀb`. With `γ = 0` and a
/// rank-deficient `A` the minimum-norm solution is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct L2Solver;

impl Solver for L2Solver {
    fn method(&self) -> FitMethod {
        FitMethod::L2
    }

    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>, gamma: f64) -> Result<DVector<f64>, ApproxError> {
        if gamma == 0.0 {
            return solve_least_squares(a, b);
        }
        let penalty = vec![gamma; a.ncols()];
        let (xs, ys) = stack_penalty(a, b, &penalty);
        solve_least_squares(&xs, &ys)
    }
}

/// Strategy for `method`, configured from `opts`.
pub fn solver_for(method: FitMethod, opts: &SolverOptions) -> Box<dyn Solver> {
    match method {
        FitMethod::L2 => Box::new(L2Solver),
        FitMethod::L1 => Box::new(L1Solver {
            max_iter: opts.l1_max_iter,
            tol: opts.l1_tol,
        }),
        FitMethod::Weighted => Box::new(WeightedSolver {
            max_iter: opts.weighted_max_iter,
            tol: opts.weighted_tol,
        }),
    }
}

/// Regularization strength must be finite and non-negative.
pub fn validate_regularization(gamma: f64) -> Result<(), ApproxError> {
    if gamma.is_finite() && gamma >= 0.0 {
        Ok(())
    } else {
        Err(ApproxError::invalid(format!(
            "regularization strength must be >= 0, got {gamma}"
        )))
    }
}

/// Fit `A w ≈ b` under `method` with regularization `gamma`.
pub fn fit(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    method: FitMethod,
    gamma: f64,
    opts: &SolverOptions,
) -> Result<Vec<f64>, ApproxError> {
    validate_regularization(gamma)?;
    if a.nrows() != b.len() {
        return Err(ApproxError::invalid(format!(
            "design matrix has {} rows but target vector has {} entries",
            a.nrows(),
            b.len()
        )));
    }

    let solver = solver_for(method, opts);
    let w = solver.solve(a, b, gamma)?;
    debug!(
        method = %solver.method(),
        gamma,
        rows = a.nrows(),
        cols = a.ncols(),
        "solved weights"
    );
    Ok(w.iter().copied().collect())
}

/// Like [`fit`], with the method given by name (`"l2"`, `"l1"`, `"weighted"`).
pub fn fit_by_name(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    method: &str,
    gamma: f64,
    opts: &SolverOptions,
) -> Result<Vec<f64>, ApproxError> {
    let method: FitMethod = method.parse()?;
    fit(a, b, method, gamma, opts)
}
