//! Shared run pipeline used by `fit` and `compare`.
//!
//! target -> approximate (per method, in parallel) -> comparison table -> exports
//!
//! The command handlers only deal with presentation.

use std::path::PathBuf;

use tracing::info;

use crate::domain::{MethodFit, RunConfig, TargetSpec};
use crate::error::AppError;
use crate::fit::approximate_all;
use crate::io::{build_fit_report, load_payoff_table, write_fit_json, write_report_bundle};
use crate::models::{CatalogPayoff, TargetPayoff};
use crate::report::{ComparisonTable, build_comparison};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub fits: Vec<MethodFit>,
    pub table: ComparisonTable,
    /// Files written under `out_dir` (tables and figure snippets).
    pub artifacts: Vec<PathBuf>,
}

/// Resolve the configured target payoff.
pub fn load_target(target: &TargetSpec) -> Result<Box<dyn TargetPayoff + Send + Sync>, AppError> {
    match target {
        TargetSpec::Catalog { kind, center, width } => Ok(Box::new(CatalogPayoff::new(*kind, *center, *width)?)),
        TargetSpec::Table(path) => Ok(Box::new(load_payoff_table(path)?)),
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_approximation(config: &RunConfig) -> Result<RunOutput, AppError> {
    let target = load_target(&config.target)?;
    run_with_target(config, &*target)
}

/// Execute the pipeline against an already constructed target.
pub fn run_with_target<T>(config: &RunConfig, target: &T) -> Result<RunOutput, AppError>
where
    T: TargetPayoff + Sync + ?Sized,
{
    if config.methods.is_empty() {
        return Err(AppError::new(2, "No fitting method selected."));
    }

    let base = config.approx_config(config.methods[0]);
    let fits = approximate_all(target, &config.strikes, config.spot, &base, &config.methods)?;
    info!(methods = fits.len(), strikes = config.strikes.len(), "fitted");

    let table = build_comparison(
        target,
        &config.strikes,
        config.parity,
        &fits,
        config.spot,
        &config.eval_grid,
    )?;

    if let Some(path) = &config.export_json {
        let report = build_fit_report(config.spot, &config.strikes, config.parity, &fits);
        write_fit_json(path, &report)?;
        info!(path = %path.display(), "wrote report JSON");
    }

    let artifacts = match &config.out_dir {
        Some(dir) => write_report_bundle(dir, &table, config.regularization)?,
        None => Vec::new(),
    };

    Ok(RunOutput { fits, table, artifacts })
}
