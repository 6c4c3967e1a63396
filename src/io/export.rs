//! Export comparison curves as whitespace-separated data tables.
//!
//! The tables are meant to be read by pgfplots (`\addplot table`) but are just as
//! easy to load in a spreadsheet or with `numpy.loadtxt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::FitMethod;
use crate::error::AppError;
use crate::report::ComparisonTable;

/// Write `prices`, `target` and one column per requested method.
///
/// The header is a `#` comment naming the columns, e.g. `# S target l2 l1`.
/// Methods missing from `table` are an error.
pub fn write_comparison_dat(path: &Path, table: &ComparisonTable, methods: &[FitMethod]) -> Result<(), AppError> {
    let columns = methods
        .iter()
        .map(|&m| {
            table
                .curve(m)
                .map(|c| c.values.as_slice())
                .ok_or_else(|| AppError::new(2, format!("No {} approximation to export.", m.name())))
        })
        .collect::<Result<Vec<&[f64]>, AppError>>()?;

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create data table '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    let mut header = String::from("# S target");
    for m in methods {
        header.push(' ');
        header.push_str(m.name());
    }
    writeln!(out, "{header}").map_err(|e| AppError::new(2, format!("Failed to write data table header: {e}")))?;

    for (i, (s, t)) in table.prices.iter().zip(&table.target).enumerate() {
        let mut row = format!("{s:.6} {t:.6}");
        for col in &columns {
            row.push_str(&format!(" {:.6}", col[i]));
        }
        writeln!(out, "{row}").map_err(|e| AppError::new(2, format!("Failed to write data table row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush data table '{}': {e}", path.display())))?;
    Ok(())
}
