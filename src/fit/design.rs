//! Design matrix assembly.
//!
//! Given a basis and a target payoff, sample both on the price grid:
//!
//! ```text
//! A[i][j] = basis_j(S_i)      b[i] = target(S_i)
//! ```

use nalgebra::{DMatrix, DVector};

use crate::domain::{BasisFunction, GridConfig};
use crate::error::ApproxError;
use crate::fit::price_grid::price_grid;
use crate::models::{TargetPayoff, fill_design_row};

/// The discretized linear system `A w ≈ b` plus the grid it was sampled on.
#[derive(Debug, Clone)]
pub struct DesignSystem {
    pub grid: Vec<f64>,
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
}

impl DesignSystem {
    pub fn grid_size(&self) -> usize {
        self.a.nrows()
    }

    pub fn basis_count(&self) -> usize {
        self.a.ncols()
    }
}

/// Evaluate `basis` and `target` on the price grid around `spot`.
///
/// Fails with `InvalidInput` if `spot <= 0` or the grid is malformed. A target
/// failure at any grid point is returned unchanged.
pub fn assemble_system<T>(
    basis: &[BasisFunction],
    target: &T,
    spot: f64,
    grid: &GridConfig,
) -> Result<DesignSystem, ApproxError>
where
    T: TargetPayoff + ?Sized,
{
    let prices = price_grid(spot, grid)?;
    let n = prices.len();
    let p = basis.len();

    let mut a = DMatrix::<f64>::zeros(n, p);
    let mut b = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; p];

    for (i, &s) in prices.iter().enumerate() {
        fill_design_row(basis, s, &mut row);
        for (j, &v) in row.iter().enumerate() {
            a[(i, j)] = v;
        }
        b[i] = target.evaluate(s)?;
    }

    Ok(DesignSystem { grid: prices, a, b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParityMode;
    use crate::math::build_basis;
    use crate::models::PayoffFn;

    #[test]
    fn default_shape_is_hundred_rows() {
        let basis = build_basis(&[90.0, 100.0, 110.0], ParityMode::Off);
        let target = PayoffFn(|s: f64| (s - 100.0).max(0.0));
        let sys = assemble_system(&basis, &target, 100.0, &GridConfig::default()).unwrap();
        assert_eq!(sys.a.shape(), (100, 6));
        assert_eq!(sys.b.len(), 100);
        assert_eq!(sys.grid_size(), 100);
        assert_eq!(sys.basis_count(), 6);
    }

    #[test]
    fn entries_are_basis_values_on_grid() {
        let basis = build_basis(&[100.0], ParityMode::On);
        let target = PayoffFn(|s: f64| 2.0 * s);
        let sys = assemble_system(&basis, &target, 100.0, &GridConfig::default()).unwrap();
        for (i, &s) in sys.grid.iter().enumerate() {
            assert_eq!(sys.a[(i, 0)], (s - 100.0).max(0.0));
            assert_eq!(sys.a[(i, 1)], s);
            assert_eq!(sys.b[i], 2.0 * s);
        }
    }

    #[test]
    fn target_failure_propagates_unchanged() {
        let basis = build_basis(&[100.0], ParityMode::Off);
        let target = PayoffFn(|s: f64| if s > 120.0 { f64::INFINITY } else { 1.0 });
        match assemble_system(&basis, &target, 100.0, &GridConfig::default()) {
            Err(ApproxError::Evaluation { price, .. }) => assert!(price > 120.0),
            other => panic!("expected evaluation error, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_spot_is_invalid() {
        let basis = build_basis(&[100.0], ParityMode::Off);
        let target = PayoffFn(|s: f64| s);
        let err = assemble_system(&basis, &target, 0.0, &GridConfig::default()).unwrap_err();
        assert!(matches!(err, ApproxError::InvalidInput { .. }));
    }

    #[test]
    fn empty_basis_gives_zero_columns() {
        let target = PayoffFn(|s: f64| s);
        let sys = assemble_system(&[], &target, 100.0, &GridConfig::default()).unwrap();
        assert_eq!(sys.a.shape(), (100, 0));
    }
}
