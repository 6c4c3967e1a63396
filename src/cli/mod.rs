//! Command-line parsing for the payoff replicator.
//!
//! Argument parsing and command dispatch stay separate from the fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FitMethod, TargetKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "replicate",
    version,
    about = "Approximate a payoff with a portfolio of vanilla calls and puts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one method and print its weights (plus optional plot/exports).
    Fit(FitArgs),
    /// Fit L2, L1 and weighted-error side by side and compare them.
    Compare(RunArgs),
    /// Display a previously exported report JSON.
    Show(ShowArgs),
}

/// Options for a single-method fit.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Fitting method.
    #[arg(short = 'm', long, value_enum, default_value_t = FitMethod::L2)]
    pub method: FitMethod,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by `fit` and `compare`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Comma-separated strikes.
    #[arg(
        short = 'k',
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "70,80,90,100,105,110,120,130,98"
    )]
    pub strikes: Vec<f64>,

    /// Current underlying price (centres the sampling grid).
    #[arg(short = 's', long, default_value_t = 100.0)]
    pub spot: f64,

    /// Regularization strength (>= 0).
    #[arg(short = 'g', long, default_value_t = 0.1)]
    pub gamma: f64,

    /// Use put-call parity: calls plus a spot position instead of calls and puts.
    #[arg(long)]
    pub parity: bool,

    /// Built-in target payoff.
    #[arg(short = 't', long, value_enum, default_value_t = TargetKind::Sample)]
    pub target: TargetKind,

    /// Centre (strike) of the built-in target.
    #[arg(long, default_value_t = 100.0)]
    pub center: f64,

    /// Wing distance of the built-in target (butterfly).
    #[arg(long, default_value_t = 10.0)]
    pub width: f64,

    /// Load the target from a `price,payoff` CSV instead (overrides --target).
    #[arg(long, value_name = "CSV")]
    pub target_csv: Option<PathBuf>,

    /// Number of sampling points used for fitting.
    #[arg(long, default_value_t = 100)]
    pub grid_points: usize,

    /// Lower end of the sampling grid as a multiple of spot.
    #[arg(long, default_value_t = 0.5)]
    pub grid_lower: f64,

    /// Upper end of the sampling grid as a multiple of spot.
    #[arg(long, default_value_t = 1.5)]
    pub grid_upper: f64,

    /// Number of points used to compare target and approximations.
    #[arg(long, default_value_t = 500)]
    pub eval_points: usize,

    /// Coordinate-descent sweep cap for L1.
    #[arg(long, default_value_t = 10_000)]
    pub l1_max_iter: usize,

    /// Iteration cap for the weighted-error minimizer.
    #[arg(long, default_value_t = 1_000)]
    pub weighted_max_iter: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width_cols: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height_rows: usize,

    /// Export positions per method to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Write `.dat` tables and `.tex` figure snippets into this directory.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Options for displaying a saved report.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Report JSON produced by `--export-json`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Also plot the saved portfolios.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width_cols: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_defaults() {
        let cli = Cli::parse_from(["replicate", "compare"]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.strikes, vec![70.0, 80.0, 90.0, 100.0, 105.0, 110.0, 120.0, 130.0, 98.0]);
        assert_eq!(args.gamma, 0.1);
        assert!(!args.parity);
        assert_eq!(args.target, TargetKind::Sample);
    }

    #[test]
    fn fit_accepts_method_and_strike_list() {
        let cli = Cli::parse_from([
            "replicate", "fit", "--method", "weighted", "--strikes", "90,100,110", "--parity", "--gamma", "0",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.method, FitMethod::Weighted);
        assert_eq!(args.run.strikes, vec![90.0, 100.0, 110.0]);
        assert!(args.run.parity);
        assert_eq!(args.run.gamma, 0.0);
    }
}
