//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON
//! - reloaded later for display or comparisons

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ApproxError;
use crate::math::{call_payoff, put_payoff};

/// One elementary payoff shape of the replicating basis.
///
/// The strike is stored by value in each variant, so every basis function is
/// independent of the slice it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BasisFunction {
    /// `max(S - K, 0)`
    Call { strike: f64 },
    /// `max(K - S, 0)`
    Put { strike: f64 },
    /// Unit position in the underlying: `S`.
    Spot,
}

impl BasisFunction {
    /// Payoff at underlying price `s`.
    pub fn value(&self, s: f64) -> f64 {
        match *self {
            BasisFunction::Call { strike } => call_payoff(s, strike),
            BasisFunction::Put { strike } => put_payoff(s, strike),
            BasisFunction::Spot => s,
        }
    }

    pub fn strike(&self) -> Option<f64> {
        match *self {
            BasisFunction::Call { strike } | BasisFunction::Put { strike } => Some(strike),
            BasisFunction::Spot => None,
        }
    }
}

impl fmt::Display for BasisFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisFunction::Call { strike } => write!(f, "Call {strike}"),
            BasisFunction::Put { strike } => write!(f, "Put {strike}"),
            BasisFunction::Spot => write!(f, "Spot"),
        }
    }
}

/// Basis shape for a single approximation run.
///
/// - `Off`: a call and a put per strike (interleaved), no spot column.
/// - `On`: a call per strike plus a trailing unit spot position; puts are
///   reachable through put-call parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParityMode {
    #[default]
    Off,
    On,
}

impl ParityMode {
    pub fn is_on(self) -> bool {
        self == ParityMode::On
    }

    /// Number of basis columns emitted per strike.
    pub fn columns_per_strike(self) -> usize {
        match self {
            ParityMode::Off => 2,
            ParityMode::On => 1,
        }
    }
}

impl From<bool> for ParityMode {
    fn from(value: bool) -> Self {
        if value { ParityMode::On } else { ParityMode::Off }
    }
}

/// Objective used by the fitting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitMethod {
    /// Ridge: `‖Aw − b‖² + γ‖w‖²`.
    L2,
    /// Lasso: squared error plus `γ‖w‖₁`, coordinate descent.
    L1,
    /// `Σ |b_i|·|pred_i − b_i| + γ‖w‖₁`.
    Weighted,
}

impl FitMethod {
    pub const ALL: [FitMethod; 3] = [FitMethod::L2, FitMethod::L1, FitMethod::Weighted];

    /// Short lowercase name, also used as a column header in exported tables.
    pub fn name(self) -> &'static str {
        match self {
            FitMethod::L2 => "l2",
            FitMethod::L1 => "l1",
            FitMethod::Weighted => "weighted",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FitMethod::L2 => "L2",
            FitMethod::L1 => "L1",
            FitMethod::Weighted => "Weighted Error",
        }
    }
}

impl FromStr for FitMethod {
    type Err = ApproxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" => Ok(FitMethod::L2),
            "l1" => Ok(FitMethod::L1),
            "weighted" => Ok(FitMethod::Weighted),
            _ => Err(ApproxError::invalid(format!(
                "unknown fitting method '{s}' (use 'l1', 'l2', or 'weighted')"
            ))),
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discretization of the fitting domain around spot.
///
/// The grid is `points` evenly spaced prices from `lower_mult × spot` to
/// `upper_mult × spot`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub points: usize,
    pub lower_mult: f64,
    pub upper_mult: f64,
}

impl GridConfig {
    /// Same span as the default grid, with a different point count.
    pub fn with_points(points: usize) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            points: 100,
            lower_mult: 0.5,
            upper_mult: 1.5,
        }
    }
}

/// Iteration caps and tolerances for the iterative solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Coordinate descent sweeps for the L1 solver.
    pub l1_max_iter: usize,
    /// Duality-gap tolerance for the L1 solver (relative to `‖b‖²`).
    pub l1_tol: f64,
    /// Reweighting iterations for the weighted-error solver.
    pub weighted_max_iter: usize,
    /// Step tolerance for the weighted-error solver.
    pub weighted_tol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            l1_max_iter: 10_000,
            l1_tol: 1e-4,
            weighted_max_iter: 1_000,
            weighted_tol: 1e-8,
        }
    }
}

/// Library default regularization strength.
pub const DEFAULT_REGULARIZATION: f64 = 0.05;

/// Everything a single call to `approximate_payoff` needs besides the target,
/// the strikes and the spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxConfig {
    pub method: FitMethod,
    pub regularization: f64,
    pub parity: ParityMode,
    pub grid: GridConfig,
    pub solver: SolverOptions,
}

impl Default for ApproxConfig {
    fn default() -> Self {
        Self {
            method: FitMethod::L2,
            regularization: DEFAULT_REGULARIZATION,
            parity: ParityMode::Off,
            grid: GridConfig::default(),
            solver: SolverOptions::default(),
        }
    }
}

/// Output of one approximation run.
///
/// `weights` has one entry per option column (calls, plus interleaved puts when
/// parity is off). `spot_coefficient` is the unit-spot position and is exactly
/// `0.0` when parity is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub weights: Vec<f64>,
    pub spot_coefficient: f64,
}

/// A fit tagged with the method and regularization that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodFit {
    pub method: FitMethod,
    pub regularization: f64,
    pub result: FitResult,
}

/// A labelled holding of the replicating portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub instrument: BasisFunction,
    pub weight: f64,
}

/// Built-in target payoffs available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Piecewise hump: linear wing, sine bump, power decay, flat tail (+15).
    Sample,
    Call,
    Put,
    Straddle,
    Butterfly,
    Digital,
}

/// Where the driver gets its target payoff from.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// Built-in payoff centred at `center` with wing distance `width`.
    Catalog {
        kind: TargetKind,
        center: f64,
        width: f64,
    },
    /// `price,payoff` table, linearly interpolated.
    Table(PathBuf),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub strikes: Vec<f64>,
    pub spot: f64,
    pub methods: Vec<FitMethod>,
    pub regularization: f64,
    pub parity: ParityMode,
    pub target: TargetSpec,
    pub grid: GridConfig,
    pub solver: SolverOptions,

    /// Grid used to compare target and approximations after fitting.
    pub eval_grid: GridConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Approximation settings for one method of this run.
    pub fn approx_config(&self, method: FitMethod) -> ApproxConfig {
        ApproxConfig {
            method,
            regularization: self.regularization,
            parity: self.parity,
            grid: self.grid,
            solver: self.solver,
        }
    }
}

/// A saved fit report (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub spot: f64,
    pub strikes: Vec<f64>,
    pub parity: ParityMode,
    pub fits: Vec<MethodReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    pub method: FitMethod,
    pub regularization: f64,
    pub positions: Vec<Position>,
}
