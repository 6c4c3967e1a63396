//! TikZ/pgfplots figure templates referencing exported data tables.
//!
//! Two figures are produced for a full comparison run:
//! - `regularization_comparison`: target vs L2 and L1
//! - `weighted_loss`: target vs the weighted-error fit
//!
//! Each figure is a `.dat` table plus a `.tex` snippet meant to be `\input` into a
//! LaTeX document that loads pgfplots.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::FitMethod;
use crate::error::AppError;
use crate::io::export::write_comparison_dat;
use crate::report::ComparisonTable;

/// One approximation line of a figure.
#[derive(Debug, Clone)]
pub struct TikzSeries {
    /// pgfplots style options, e.g. `thick, dashed, red`.
    pub style: &'static str,
    pub method: FitMethod,
}

/// A figure: its table stem, title and series (target is always column 1).
#[derive(Debug, Clone)]
pub struct TikzFigure {
    pub stem: &'static str,
    pub title: &'static str,
    pub series: Vec<TikzSeries>,
}

impl TikzFigure {
    pub fn methods(&self) -> Vec<FitMethod> {
        self.series.iter().map(|s| s.method).collect()
    }
}

/// The two standard figures.
pub fn standard_figures() -> Vec<TikzFigure> {
    vec![
        TikzFigure {
            stem: "regularization_comparison",
            title: "L1 and L2 Regularization Comparison",
            series: vec![
                TikzSeries {
                    style: "thick, dashed, red",
                    method: FitMethod::L2,
                },
                TikzSeries {
                    style: "thick, dashdotted, blue",
                    method: FitMethod::L1,
                },
            ],
        },
        TikzFigure {
            stem: "weighted_loss",
            title: "Weighted Error Method Comparison",
            series: vec![TikzSeries {
                style: "thick, dotted, green!50!black",
                method: FitMethod::Weighted,
            }],
        },
    ]
}

/// Render the `.tex` snippet for `figure`.
pub fn render_tikz(figure: &TikzFigure, regularization: f64) -> String {
    let dat = format!("{}.dat", figure.stem);
    let mut out = String::new();
    out.push_str("\\begin{tikzpicture}\n");
    out.push_str("\\begin{axis}[\n");
    out.push_str("    width=0.9\\textwidth,\n");
    out.push_str("    height=6cm,\n");
    out.push_str("    grid=both,\n");
    out.push_str("    grid style={line width=.1pt, draw=gray!10},\n");
    out.push_str("    major grid style={line width=.2pt,draw=gray!50},\n");
    out.push_str("    xlabel style={font=\\tiny},\n");
    out.push_str("    ylabel style={font=\\tiny},\n");
    out.push_str("    tick label style={font=\\tiny},\n");
    out.push_str("    title style={font=\\small},\n");
    out.push_str("    legend style={font=\\tiny, at={(0.02,0.98)}, anchor=north west},\n");
    out.push_str("    xlabel={Underlying Asset Price at Maturity},\n");
    out.push_str("    ylabel={Payoff},\n");
    out.push_str(&format!("    title={{{}}}\n", figure.title));
    out.push_str("]\n\n");

    out.push_str(&format!("\\addplot[thick, black] table[x index=0,y index=1] {{{dat}}};\n"));
    out.push_str("\\addlegendentry{Target Payoff}\n\n");

    for (i, s) in figure.series.iter().enumerate() {
        out.push_str(&format!(
            "\\addplot[{}] table[x index=0,y index={}] {{{dat}}};\n",
            s.style,
            i + 2
        ));
        out.push_str(&format!(
            "\\addlegendentry{{{} ($\\gamma={regularization:.2}$)}}\n\n",
            legend_label(s.method)
        ));
    }

    out.push_str("\\end{axis}\n");
    out.push_str("\\end{tikzpicture}\n");
    out
}

fn legend_label(method: FitMethod) -> &'static str {
    match method {
        FitMethod::L2 => "L2 Approximation",
        FitMethod::L1 => "L1 Approximation",
        FitMethod::Weighted => "Weighted Error",
    }
}

/// Write every standard figure whose methods are all present in `table`.
///
/// Returns the written paths (tables and snippets).
pub fn write_report_bundle(dir: &Path, table: &ComparisonTable, regularization: f64) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();
    for figure in standard_figures() {
        let methods = figure.methods();
        if !methods.iter().all(|&m| table.curve(m).is_some()) {
            continue;
        }

        let dat_path = dir.join(format!("{}.dat", figure.stem));
        write_comparison_dat(&dat_path, table, &methods)?;

        let tex_path = dir.join(format!("{}.tex", figure.stem));
        fs::write(&tex_path, render_tikz(&figure, regularization))
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", tex_path.display())))?;

        info!(figure = figure.stem, dir = %dir.display(), "wrote figure");
        written.push(dat_path);
        written.push(tex_path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_references_table_columns_in_order() {
        let fig = &standard_figures()[0];
        let tex = render_tikz(fig, 0.1);
        assert!(tex.starts_with("\\begin{tikzpicture}\n"));
        assert!(tex.ends_with("\\end{tikzpicture}\n"));
        assert!(tex.contains("title={L1 and L2 Regularization Comparison}"));
        assert!(tex.contains(
            "\\addplot[thick, dashed, red] table[x index=0,y index=2] {regularization_comparison.dat};"
        ));
        assert!(tex.contains(
            "\\addplot[thick, dashdotted, blue] table[x index=0,y index=3] {regularization_comparison.dat};"
        ));
        assert!(tex.contains("\\addlegendentry{L2 Approximation ($\\gamma=0.10$)}"));
    }

    #[test]
    fn weighted_figure_has_single_series() {
        let fig = &standard_figures()[1];
        let tex = render_tikz(fig, 0.05);
        assert_eq!(tex.matches("\\addplot[").count(), 2);
        assert!(tex.contains("\\addlegendentry{Weighted Error ($\\gamma=0.05$)}"));
    }
}
