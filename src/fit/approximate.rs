//! Top-level approximation: basis → design system → solver → split result.
//!
//! Each call is independent and pure; `approximate_all` runs several methods in
//! parallel on the same inputs.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{ApproxConfig, FitMethod, FitResult, MethodFit, ParityMode};
use crate::error::ApproxError;
use crate::fit::design::assemble_system;
use crate::fit::solver::{fit, validate_regularization};
use crate::math::build_basis;
use crate::models::TargetPayoff;

/// Approximate `target` with options at `strikes` (plus spot when parity is on).
///
/// With parity on, the last solved weight becomes the spot coefficient; with parity
/// off, every weight is an option weight and the spot coefficient is `0.0`.
pub fn approximate_payoff<T>(
    target: &T,
    strikes: &[f64],
    spot: f64,
    config: &ApproxConfig,
) -> Result<FitResult, ApproxError>
where
    T: TargetPayoff + ?Sized,
{
    // Reject bad settings before touching the caller's payoff.
    validate_regularization(config.regularization)?;

    let basis = build_basis(strikes, config.parity);
    let system = assemble_system(&basis, target, spot, &config.grid)?;
    let solution = fit(
        &system.a,
        &system.b,
        config.method,
        config.regularization,
        &config.solver,
    )?;

    let result = split_solution(solution, config.parity);
    debug!(
        method = %config.method,
        strikes = strikes.len(),
        spot_coefficient = result.spot_coefficient,
        "approximation finished"
    );
    Ok(result)
}

/// Run `approximate_payoff` once per method, in parallel, preserving order.
pub fn approximate_all<T>(
    target: &T,
    strikes: &[f64],
    spot: f64,
    config: &ApproxConfig,
    methods: &[FitMethod],
) -> Result<Vec<MethodFit>, ApproxError>
where
    T: TargetPayoff + Sync + ?Sized,
{
    methods
        .par_iter()
        .map(|&method| {
            let cfg = ApproxConfig { method, ..*config };
            approximate_payoff(target, strikes, spot, &cfg).map(|result| MethodFit {
                method,
                regularization: cfg.regularization,
                result,
            })
        })
        .collect()
}

/// Split a solved vector into option weights and the spot coefficient.
pub fn split_solution(mut solution: Vec<f64>, parity: ParityMode) -> FitResult {
    let spot_coefficient = if parity.is_on() {
        solution.pop().unwrap_or(0.0)
    } else {
        0.0
    };
    FitResult {
        weights: solution,
        spot_coefficient,
    }
}
