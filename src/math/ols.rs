//! Least squares solver.
//!
//! Every fitting method in this crate reduces (at least per iteration) to a problem
//! of the form:
//!
//! ```text
//! minimize ‖X β − y‖²
//! ```
//!
//! Implementation choices:
//! - Ridge and reweighted problems are posed as *stacked* systems
//!   (`[X; √γ I] β = [y; 0]`) rather than via a literal inverse of `XᵀX + γI`.
//! - We use SVD so that tall, square and rank-deficient systems all work; small
//!   singular values are truncated, which yields the minimum-norm solution.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)

use nalgebra::{DMatrix, DVector};

use crate::error::ApproxError;

/// Solve a least squares problem using SVD.
///
/// Singular values below `max_sv × max(rows, cols) × ε` are treated as zero, so a
/// rank-deficient system returns its minimum-norm solution. A system with no
/// columns yields an empty solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, ApproxError> {
    if x.nrows() != y.len() {
        return Err(ApproxError::invalid(format!(
            "least squares shape mismatch: {} rows vs {} targets",
            x.nrows(),
            y.len()
        )));
    }
    if x.ncols() == 0 {
        return Ok(DVector::zeros(0));
    }
    if x.nrows() == 0 {
        return Ok(DVector::zeros(x.ncols()));
    }

    let svd = x.clone().svd(true, true);
    let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = max_sv * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;

    let beta = svd
        .solve(y, tol)
        .map_err(|e| ApproxError::numerical(format!("SVD solve failed: {e}")))?;
    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(ApproxError::numerical("least squares produced non-finite coefficients"))
    }
}

/// Stack `x` over `diag(sqrt(penalty))` and `y` over zeros.
///
/// Solving the stacked system in the least squares sense minimizes
/// `‖X β − y‖² + Σ penalty_j β_j²`.
pub fn stack_penalty(x: &DMatrix<f64>, y: &DVector<f64>, penalty: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
    let n = x.nrows();
    let p = x.ncols();
    let xs = DMatrix::from_fn(n + p, p, |i, j| {
        if i < n {
            x[(i, j)]
        } else if i - n == j {
            penalty[j].max(0.0).sqrt()
        } else {
            0.0
        }
    });
    let ys = DVector::from_fn(n + p, |i, _| if i < n { y[i] } else { 0.0 });
    (xs, ys)
}
