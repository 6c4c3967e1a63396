//! Evaluation grid generation.
//!
//! The continuous fitting problem is discretized on evenly spaced underlying
//! prices around spot. The default grid (100 points over `[0.5 S₀, 1.5 S₀]`) is
//! kept for compatibility with previously published weights.

use crate::domain::GridConfig;
use crate::error::ApproxError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, ApproxError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(ApproxError::invalid(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(ApproxError::invalid("Grid steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(min + step * i as f64);
    }
    out.push(max);
    Ok(out)
}

/// Price grid for `spot` under `grid`.
///
/// Fails with `InvalidInput` when `spot <= 0` (or non-finite) or when the grid
/// configuration is malformed.
pub fn price_grid(spot: f64, grid: &GridConfig) -> Result<Vec<f64>, ApproxError> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(ApproxError::invalid(format!("spot must be > 0, got {spot}")));
    }
    validate_grid(grid)?;
    lin_space(grid.lower_mult * spot, grid.upper_mult * spot, grid.points)
}

fn validate_grid(grid: &GridConfig) -> Result<(), ApproxError> {
    if !(grid.lower_mult.is_finite() && grid.upper_mult.is_finite()) {
        return Err(ApproxError::invalid("grid multipliers must be finite"));
    }
    if grid.lower_mult < 0.0 || grid.upper_mult <= grid.lower_mult {
        return Err(ApproxError::invalid(format!(
            "grid multipliers must satisfy 0 <= lower < upper, got lower={}, upper={}",
            grid.lower_mult, grid.upper_mult
        )));
    }
    if grid.points < 2 {
        return Err(ApproxError::invalid(format!(
            "grid needs at least 2 points, got {}",
            grid.points
        )));
    }
    Ok(())
}
