//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output. Plot elements:
//! - target payoff: `-` line
//! - approximations: one marker per column, `2` (L2), `1` (L1), `w` (weighted)

use crate::domain::{FitMethod, FitReport};
use crate::models::portfolio_value;
use crate::report::ComparisonTable;

/// Marker character for a method's curve.
pub fn method_marker(method: FitMethod) -> char {
    match method {
        FitMethod::L2 => '2',
        FitMethod::L1 => '1',
        FitMethod::Weighted => 'w',
    }
}

/// Plot the target and every approximation in `table`.
pub fn render_comparison_plot(table: &ComparisonTable, width: usize, height: usize) -> String {
    let target: Vec<(f64, f64)> = table.prices.iter().copied().zip(table.target.iter().copied()).collect();
    let series: Vec<(FitMethod, Vec<(f64, f64)>)> = table
        .curves
        .iter()
        .map(|c| {
            let pts = table.prices.iter().copied().zip(c.values.iter().copied()).collect();
            (c.method, pts)
        })
        .collect();
    render_plot(Some(&target), &series, width, height)
}

/// Plot the portfolios stored in a saved report over `[lower, upper]`.
///
/// The target is not part of a report, so only the approximations are drawn.
pub fn render_report_plot(report: &FitReport, lower: f64, upper: f64, width: usize, height: usize) -> String {
    let n = width.max(10);
    let prices: Vec<f64> = (0..n)
        .map(|i| lower + (upper - lower) * i as f64 / (n as f64 - 1.0))
        .collect();
    let series: Vec<(FitMethod, Vec<(f64, f64)>)> = report
        .fits
        .iter()
        .map(|f| {
            let pts = prices.iter().map(|&s| (s, portfolio_value(&f.positions, s))).collect();
            (f.method, pts)
        })
        .collect();
    render_plot(None, &series, width, height)
}

fn render_plot(
    line: Option<&[(f64, f64)]>,
    series: &[(FitMethod, Vec<(f64, f64)>)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = line
        .into_iter()
        .flatten()
        .chain(series.iter().flat_map(|(_, pts)| pts.iter()));
    let Some((x_min, x_max, y_min, y_max)) = bounds(all) else {
        return "Plot: no data\n".to_string();
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Target line first so approximation markers overlay it.
    if let Some(line) = line {
        draw_curve(&mut grid, line, x_min, x_max, y_min, y_max);
    }
    for (method, pts) in series {
        draw_markers(&mut grid, pts, method_marker(*method), x_min, x_max, y_min, y_max);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: S=[{x_min:.2}, {x_max:.2}] | payoff=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if !series.is_empty() || line.is_some() {
        let mut legend: Vec<String> = Vec::new();
        if line.is_some() {
            legend.push("- target".to_string());
        }
        for (method, _) in series {
            legend.push(format!("{} {}", method_marker(*method), method.display_name()));
        }
        out.push_str(&format!("Legend: {}\n", legend.join("  ")));
    }
    out
}

fn bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64, f64, f64)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_min.is_finite() && x_max > x_min && y_min.is_finite() {
        Some((x_min, x_max, y_min, y_max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(0.5);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (y_max).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// One marker per column: the last sample that lands in a column wins.
fn draw_markers(
    grid: &mut [Vec<char>],
    pts: &[(f64, f64)],
    marker: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();
    let mut rows: Vec<Option<usize>> = vec![None; width];
    for &(x, y) in pts {
        if y.is_finite() {
            rows[map_x(x, x_min, x_max, width)] = Some(map_y(y, y_min, y_max, height));
        }
    }
    for (col, row) in rows.into_iter().enumerate() {
        if let Some(row) = row {
            grid[row][col] = marker;
        }
    }
}

/// Integer line drawing (Bresenham); only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BasisFunction, MethodReport, ParityMode, Position};
    use crate::report::MethodCurve;

    #[test]
    fn flat_target_is_a_single_row() {
        let table = ComparisonTable {
            prices: vec![50.0, 100.0, 150.0],
            target: vec![1.0, 1.0, 1.0],
            curves: vec![],
        };
        let txt = render_comparison_plot(&table, 10, 5);
        let expected = concat!(
            "Plot: S=[50.00, 150.00] | payoff=[0.50, 1.50]\n",
            "          \n",
            "          \n",
            "----------\n",
            "          \n",
            "          \n",
            "Legend: - target\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn markers_overlay_target() {
        let table = ComparisonTable {
            prices: vec![0.0, 10.0],
            target: vec![0.0, 10.0],
            curves: vec![MethodCurve {
                method: FitMethod::L1,
                regularization: 0.1,
                values: vec![0.0, 10.0],
                max_abs_error: 0.0,
                rmse: 0.0,
            }],
        };
        let txt = render_comparison_plot(&table, 12, 6);
        let rows: Vec<&str> = txt.lines().collect();
        // Header + 6 grid rows + legend.
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[1].len(), 12);
        assert_eq!(rows[6].chars().next(), Some('1'));
        assert_eq!(rows[1].chars().last(), Some('1'));
        assert!(rows[7].contains("1 L1"));
    }

    #[test]
    fn report_plot_draws_each_method() {
        let report = FitReport {
            tool: "replicate".to_string(),
            generated_at: chrono::Utc::now(),
            spot: 100.0,
            strikes: vec![100.0],
            parity: ParityMode::On,
            fits: vec![MethodReport {
                method: FitMethod::Weighted,
                regularization: 0.1,
                positions: vec![
                    Position {
                        instrument: BasisFunction::Call { strike: 100.0 },
                        weight: 1.0,
                    },
                    Position {
                        instrument: BasisFunction::Spot,
                        weight: 0.0,
                    },
                ],
            }],
        };
        let txt = render_report_plot(&report, 50.0, 150.0, 20, 8);
        assert!(txt.starts_with("Plot: S=[50.00, 150.00]"));
        let markers = txt.lines().skip(1).take(8).map(|l| l.matches('w').count()).sum::<usize>();
        assert_eq!(markers, 20);
        assert!(txt.lines().skip(1).take(8).all(|l| !l.contains('-')));
    }

    #[test]
    fn empty_input_is_reported() {
        let table = ComparisonTable {
            prices: vec![],
            target: vec![],
            curves: vec![],
        };
        assert_eq!(render_comparison_plot(&table, 10, 5), "Plot: no data\n");
    }
}
