//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{BasisFunction, MethodFit, MethodReport, ParityMode, Position, RunConfig, TargetSpec};
use crate::models::positions;
use crate::report::ComparisonTable;

/// Header describing the run.
pub fn format_run_summary(config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== replicate - payoff approximation with vanilla options ===\n");
    let target = match &config.target {
        TargetSpec::Catalog { kind, center, width } => {
            format!("{kind:?} (center={center:.2}, width={width:.2})").to_lowercase()
        }
        TargetSpec::Table(path) => format!("table {}", path.display()),
    };
    out.push_str(&format!("Target: {target}\n"));
    out.push_str(&format!("Spot: {:.2}\n", config.spot));
    out.push_str(&format!("Strikes: {}\n", fmt_vec(&config.strikes, 2)));
    out.push_str(&format!(
        "Basis: {} (put-call parity {})\n",
        match config.parity {
            ParityMode::Off => "calls + puts",
            ParityMode::On => "calls + spot",
        },
        if config.parity.is_on() { "on" } else { "off" }
    ));
    out.push_str(&format!(
        "Grid: n={} over [{:.2}, {:.2}] | gamma={:.4}\n",
        config.grid.points,
        config.grid.lower_mult * config.spot,
        config.grid.upper_mult * config.spot,
        config.regularization
    ));
    out.push('\n');

    out
}

/// Per-strike weight summary for one method.
pub fn format_weights(strikes: &[f64], parity: ParityMode, fit: &MethodFit) -> String {
    let title = format!("{} Weights", fit.method.display_name());
    let pos = positions(strikes, parity, &fit.result);
    format_positions(&title, &pos)
}

/// Per-strike weight summary for a method loaded from a saved report.
pub fn format_method_report(report: &MethodReport) -> String {
    let title = format!(
        "{} Weights (gamma={:.4})",
        report.method.display_name(),
        report.regularization
    );
    format_positions(&title, &report.positions)
}

fn format_positions(title: &str, positions: &[Position]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str(":\n");

    // Calls open a line for their strike; a put at the same strike extends it.
    let mut line = String::new();
    let mut spot = None;
    for p in positions {
        match p.instrument {
            BasisFunction::Call { strike } => {
                if !line.is_empty() {
                    out.push_str(&line);
                    out.push('\n');
                }
                line = format!("Strike {strike:3.0}: Call={:+.3}", p.weight);
            }
            BasisFunction::Put { strike } => {
                if line.is_empty() {
                    line = format!("Strike {strike:3.0}:");
                }
                line.push_str(&format!(" Put={:+.3}", p.weight));
            }
            BasisFunction::Spot => spot = Some(p.weight),
        }
    }
    if !line.is_empty() {
        out.push_str(&line);
        out.push('\n');
    }
    if let Some(w) = spot {
        out.push_str(&format!("Spot position: {w:.3}\n"));
    }
    out
}

/// Approximation error per method on the evaluation grid.
pub fn format_error_summary(table: &ComparisonTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Approximation error over [{:.2}, {:.2}] (n={}):\n",
        table.prices.first().copied().unwrap_or(0.0),
        table.prices.last().copied().unwrap_or(0.0),
        table.prices.len()
    ));
    out.push_str(format!("{:<16} {:>10} {:>12} {:>12}\n", "method", "gamma", "max_abs", "rmse").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<10} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');
    for c in &table.curves {
        out.push_str(&format!(
            "{:<16} {:>10.4} {:>12.4} {:>12.4}\n",
            c.method.display_name(),
            c.regularization,
            c.max_abs_error,
            c.rmse
        ));
    }
    out
}

fn fmt_vec(v: &[f64], decimals: usize) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.decimals$}")).collect();
    format!("[{}]", parts.join(", "))
}
