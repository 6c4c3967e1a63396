//! Read/write fit report JSON files.
//!
//! A fit report is the portable representation of a run:
//! - spot, strikes and basis shape
//! - per-method labelled positions (instrument + weight)
//!
//! The schema is defined by `domain::FitReport`. Positions carry their own
//! instrument tags, so a report can be revalued without the original target.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitReport, MethodFit, MethodReport, ParityMode};
use crate::error::AppError;
use crate::models::positions;

/// Assemble a report from in-memory fits.
pub fn build_fit_report(spot: f64, strikes: &[f64], parity: ParityMode, fits: &[MethodFit]) -> FitReport {
    FitReport {
        tool: "replicate".to_string(),
        generated_at: Utc::now(),
        spot,
        strikes: strikes.to_vec(),
        parity,
        fits: fits
            .iter()
            .map(|mf| MethodReport {
                method: mf.method,
                regularization: mf.regularization,
                positions: positions(strikes, parity, &mf.result),
            })
            .collect(),
    }
}

/// Write a fit report JSON file.
pub fn write_fit_json(path: &Path, report: &FitReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a fit report JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: FitReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
