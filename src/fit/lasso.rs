//! L1-regularized regression (lasso) by cyclic coordinate descent.
//!
//! We minimize the usual lasso objective (no intercept):
//!
//! ```text
//! (1 / 2n) ‖b − A w‖² + α ‖w‖₁
//! ```
//!
//! with `α = γ`. The `1/2n` scaling keeps `γ` comparable across grid sizes.
//!
//! Each sweep updates one coordinate at a time with the soft-threshold rule and
//! keeps the residual `r = b − A w` up to date incrementally. Convergence is
//! checked with the duality gap once the largest coordinate update becomes small
//! relative to the largest weight. Hitting the sweep cap is not an error; the
//! last iterate is returned.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::domain::FitMethod;
use crate::error::ApproxError;
use crate::fit::solver::Solver;

/// Lasso solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct L1Solver {
    pub max_iter: usize,
    pub tol: f64,
}

/// Result of a coordinate descent run.
#[derive(Debug, Clone)]
pub struct LassoOutcome {
    pub coef: DVector<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Last computed duality gap (`NaN` if never computed).
    pub gap: f64,
}

impl Solver for L1Solver {
    fn method(&self) -> FitMethod {
        FitMethod::L1
    }

    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>, gamma: f64) -> Result<DVector<f64>, ApproxError> {
        let outcome = lasso_coordinate_descent(a, b, gamma, self.max_iter, self.tol);
        if outcome.converged {
            debug!(iterations = outcome.iterations, gap = outcome.gap, "lasso converged");
        } else {
            warn!(
                iterations = outcome.iterations,
                gap = outcome.gap,
                "lasso hit the iteration cap; returning last iterate"
            );
        }
        if outcome.coef.iter().all(|v| v.is_finite()) {
            Ok(outcome.coef)
        } else {
            Err(ApproxError::numerical("lasso produced non-finite coefficients"))
        }
    }
}

/// Run cyclic coordinate descent for the lasso objective.
pub fn lasso_coordinate_descent(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    alpha: f64,
    max_iter: usize,
    tol: f64,
) -> LassoOutcome {
    let n = a.nrows();
    let p = a.ncols();
    let mut w = vec![0.0; p];

    if p == 0 || n == 0 {
        return LassoOutcome {
            coef: DVector::from_vec(w),
            iterations: 0,
            converged: true,
            gap: 0.0,
        };
    }

    let data = a.as_slice();
    let norm_cols_sq: Vec<f64> = (0..p)
        .map(|j| {
            let cj = column(data, n, j);
            dot(cj, cj)
        })
        .collect();

    let mut r: Vec<f64> = b.iter().copied().collect();
    let l1_reg = alpha * n as f64;
    let gap_tol = tol * dot(&r, &r);

    let mut converged = false;
    let mut gap = f64::NAN;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;
        let mut w_max = 0.0_f64;
        let mut d_w_max = 0.0_f64;

        for j in 0..p {
            if norm_cols_sq[j] == 0.0 {
                continue;
            }
            let cj = column(data, n, j);
            let w_j = w[j];

            if w_j != 0.0 {
                axpy(w_j, cj, &mut r);
            }

            let rho = dot(cj, &r);
            let new = soft_threshold(rho, l1_reg) / norm_cols_sq[j];

            if new != 0.0 {
                axpy(-new, cj, &mut r);
            }

            d_w_max = d_w_max.max((new - w_j).abs());
            w_max = w_max.max(new.abs());
            w[j] = new;
        }

        if d_w_max == 0.0 {
            // Exact fixed point: no coordinate moved during a full sweep.
            converged = true;
            gap = duality_gap(data, n, &w, &r, b, l1_reg);
            break;
        }

        if w_max == 0.0 || d_w_max / w_max < tol || iter + 1 == max_iter {
            gap = duality_gap(data, n, &w, &r, b, l1_reg);
            if gap < gap_tol {
                converged = true;
                break;
            }
        }
    }

    LassoOutcome {
        coef: DVector::from_vec(w),
        iterations,
        converged,
        gap,
    }
}

/// Duality gap of the (n-scaled) lasso problem at `w` with residual `r`.
fn duality_gap(
    data: &[f64],
    n: usize,
    w: &[f64],
    r: &[f64],
    b: &DVector<f64>,
    l1_reg: f64,
) -> f64 {
    let dual_norm = (0..w.len())
        .map(|j| dot(column(data, n, j), r).abs())
        .fold(0.0_f64, f64::max);
    let r_norm2 = dot(r, r);

    let (scale, mut gap) = if dual_norm > l1_reg {
        let scale = l1_reg / dual_norm;
        let a_norm2 = r_norm2 * scale * scale;
        (scale, 0.5 * (r_norm2 + a_norm2))
    } else {
        (1.0, r_norm2)
    };

    let l1_norm: f64 = w.iter().map(|v| v.abs()).sum();
    let r_dot_b: f64 = r.iter().zip(b.iter()).map(|(ri, bi)| ri * bi).sum();
    gap += l1_reg * l1_norm - scale * r_dot_b;
    gap
}

/// Column `j` of a column-major `n`-row matrix.
fn column(data: &[f64], n: usize, j: usize) -> &[f64] {
    &data[j * n..(j + 1) * n]
}

fn soft_threshold(x: f64, threshold: f64) -> f64 {
    if x > threshold {
        x - threshold
    } else if x < -threshold {
        x + threshold
    } else {
        0.0
    }
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GridConfig, ParityMode, SolverOptions};
    use crate::fit::design::assemble_system;
    use crate::fit::solver::{L2Solver, fit};
    use crate::math::build_basis;
    use crate::models::{PayoffFn, sample_payoff};

    /// Columns with disjoint support, so the problem decouples.
    fn orthogonal_system() -> (DMatrix<f64>, DVector<f64>) {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(6, 3, &[
            1.0, 0.0, 0.0,
            2.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 3.0, 0.0,
            0.0, 0.0, 2.0,
            0.0, 0.0, 1.0,
        ]);
        let b = DVector::from_row_slice(&[1.0, 2.5, -1.0, -2.5, 4.0, 1.5]);
        (a, b)
    }

    #[test]
    fn soft_threshold_shrinks_toward_zero() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }

    #[test]
    fn zero_alpha_matches_least_squares() {
        let (a, b) = orthogonal_system();
        let lasso = lasso_coordinate_descent(&a, &b, 0.0, 10_000, 1e-4);
        let ls = L2Solver.solve(&a, &b, 0.0).unwrap();
        for j in 0..3 {
            assert!(
                (lasso.coef[j] - ls[j]).abs() < 1e-9,
                "coef {j}: lasso={} ls={}",
                lasso.coef[j],
                ls[j]
            );
        }
    }

    #[test]
    fn large_alpha_zeroes_all_weights() {
        let basis = build_basis(&[80.0, 90.0, 100.0, 110.0, 120.0], ParityMode::Off);
        let target = PayoffFn(sample_payoff);
        let sys = assemble_system(&basis, &target, 100.0, &GridConfig::default()).unwrap();
        let w = fit(&sys.a, &sys.b, FitMethod::L1, 1e6, &SolverOptions::default()).unwrap();
        assert!(w.iter().all(|&v| v == 0.0), "got {w:?}");
    }

    #[test]
    fn moderate_alpha_is_sparser_than_ridge() {
        let basis = build_basis(&[70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0], ParityMode::Off);
        let target = PayoffFn(sample_payoff);
        let sys = assemble_system(&basis, &target, 100.0, &GridConfig::default()).unwrap();
        let opts = SolverOptions::default();

        let l1 = fit(&sys.a, &sys.b, FitMethod::L1, 0.5, &opts).unwrap();
        let l2 = fit(&sys.a, &sys.b, FitMethod::L2, 0.5, &opts).unwrap();
        let zeros_l1 = l1.iter().filter(|v| **v == 0.0).count();
        let zeros_l2 = l2.iter().filter(|v| **v == 0.0).count();
        assert!(zeros_l1 > zeros_l2, "l1={l1:?} l2={l2:?}");
    }

    #[test]
    fn shrinkage_is_exact_on_orthogonal_columns() {
        // For a decoupled problem each weight is soft(aᵀb, nα) / ‖a‖².
        let (a, b) = orthogonal_system();
        let alpha = 0.5;
        let out = lasso_coordinate_descent(&a, &b, alpha, 100, 1e-4);
        assert!(out.converged);
        let n = 6.0;
        let expected = [
            soft_threshold(1.0 + 5.0, n * alpha) / 5.0,
            soft_threshold(-1.0 - 7.5, n * alpha) / 10.0,
            soft_threshold(8.0 + 1.5, n * alpha) / 5.0,
        ];
        for j in 0..3 {
            assert!((out.coef[j] - expected[j]).abs() < 1e-12, "coef {j}");
        }
    }
}
