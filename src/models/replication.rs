//! Replicating portfolio evaluation.
//!
//! The fitter and the reporting layer rely on two primitive operations:
//! - build a design row for a given price (for the linear system)
//! - value the weighted basis at a price (for curves and residuals)

use crate::domain::{BasisFunction, FitResult, ParityMode, Position};
use crate::math::build_basis;

/// Fill a design row: `out[j] = basis[j](s)`.
///
/// # Panics
/// Panics if `out` is shorter than `basis`. Callers should size rows correctly.
pub fn fill_design_row(basis: &[BasisFunction], s: f64, out: &mut [f64]) {
    for (slot, f) in out.iter_mut().zip(basis) {
        *slot = f.value(s);
    }
}

/// Value of the replicating portfolio at price `s`.
///
/// `weights` pairs with the option columns of `basis` in order; a trailing
/// `Spot` column, if present, is valued with `spot_coefficient` instead.
pub fn predict(basis: &[BasisFunction], weights: &[f64], spot_coefficient: f64, s: f64) -> f64 {
    let options = basis.iter().filter(|f| !matches!(f, BasisFunction::Spot));
    let mut total = 0.0;
    for (f, w) in options.zip(weights) {
        total += w * f.value(s);
    }
    if basis.iter().any(|f| matches!(f, BasisFunction::Spot)) {
        total += spot_coefficient * s;
    }
    total
}

/// Value a fit at `s` by rebuilding its basis from the strikes.
pub fn predict_fit(strikes: &[f64], parity: ParityMode, fit: &FitResult, s: f64) -> f64 {
    let basis = build_basis(strikes, parity);
    predict(&basis, &fit.weights, fit.spot_coefficient, s)
}

/// Label each weight with the instrument it applies to.
///
/// The spot position is listed last, and only when parity is on.
pub fn positions(strikes: &[f64], parity: ParityMode, fit: &FitResult) -> Vec<Position> {
    let basis = build_basis(strikes, parity);
    let mut out: Vec<Position> = basis
        .iter()
        .filter(|f| !matches!(f, BasisFunction::Spot))
        .zip(&fit.weights)
        .map(|(&instrument, &weight)| Position { instrument, weight })
        .collect();
    if parity.is_on() {
        out.push(Position {
            instrument: BasisFunction::Spot,
            weight: fit.spot_coefficient,
        });
    }
    out
}

/// Value of a list of positions at price `s`.
pub fn portfolio_value(positions: &[Position], s: f64) -> f64 {
    positions.iter().map(|p| p.weight * p.instrument.value(s)).sum()
}
