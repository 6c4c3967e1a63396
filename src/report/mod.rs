//! Reporting utilities: comparison curves, error statistics, formatted output.

pub mod format;

pub use format::*;

use crate::domain::{FitMethod, GridConfig, MethodFit, ParityMode};
use crate::error::ApproxError;
use crate::fit::price_grid;
use crate::math::build_basis;
use crate::models::{TargetPayoff, predict};

/// One method's replicating portfolio sampled on the evaluation grid.
#[derive(Debug, Clone)]
pub struct MethodCurve {
    pub method: FitMethod,
    pub regularization: f64,
    pub values: Vec<f64>,
    pub max_abs_error: f64,
    pub rmse: f64,
}

/// Target and approximations sampled on a common price grid.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    pub prices: Vec<f64>,
    pub target: Vec<f64>,
    pub curves: Vec<MethodCurve>,
}

impl ComparisonTable {
    pub fn curve(&self, method: FitMethod) -> Option<&MethodCurve> {
        self.curves.iter().find(|c| c.method == method)
    }
}

/// Re-evaluate each fit against the target on `eval_grid` around `spot`.
pub fn build_comparison<T>(
    target: &T,
    strikes: &[f64],
    parity: ParityMode,
    fits: &[MethodFit],
    spot: f64,
    eval_grid: &GridConfig,
) -> Result<ComparisonTable, ApproxError>
where
    T: TargetPayoff + ?Sized,
{
    let prices = price_grid(spot, eval_grid)?;
    let target_values = prices
        .iter()
        .map(|&s| target.evaluate(s))
        .collect::<Result<Vec<f64>, ApproxError>>()?;

    let basis = build_basis(strikes, parity);
    let curves = fits
        .iter()
        .map(|mf| {
            let values: Vec<f64> = prices
                .iter()
                .map(|&s| predict(&basis, &mf.result.weights, mf.result.spot_coefficient, s))
                .collect();
            let (max_abs_error, rmse) = error_stats(&target_values, &values);
            MethodCurve {
                method: mf.method,
                regularization: mf.regularization,
                values,
                max_abs_error,
                rmse,
            }
        })
        .collect();

    Ok(ComparisonTable {
        prices,
        target: target_values,
        curves,
    })
}

/// `(max |a − b|, sqrt(mean (a − b)²))`; zeros for empty input.
pub fn error_stats(target: &[f64], approx: &[f64]) -> (f64, f64) {
    let n = target.len().min(approx.len());
    if n == 0 {
        return (0.0, 0.0);
    }
    let mut max_abs = 0.0_f64;
    let mut sse = 0.0;
    for (t, a) in target.iter().zip(approx) {
        let r = t - a;
        max_abs = max_abs.max(r.abs());
        sse += r * r;
    }
    (max_abs, (sse / n as f64).sqrt())
}
