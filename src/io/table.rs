//! Tabulated target payoffs from CSV.
//!
//! A payoff table is a CSV with a header row and (at least) two numeric columns:
//! the underlying price and the payoff at that price. Column names are matched
//! case-insensitively (`price`/`s`/`spot` and `payoff`/`value`/`target`); when no
//! name matches, the first two columns are used.
//!
//! Between rows the payoff is linearly interpolated. Outside the tabulated range
//! the payoff is undefined and evaluation fails.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::{AppError, ApproxError};
use crate::models::TargetPayoff;

const PRICE_COLUMNS: [&str; 3] = ["price", "s", "spot"];
const PAYOFF_COLUMNS: [&str; 3] = ["payoff", "value", "target"];

/// Piecewise-linear payoff through tabulated points.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedPayoff {
    prices: Vec<f64>,
    values: Vec<f64>,
}

impl TabulatedPayoff {
    /// Build from parallel arrays.
    ///
    /// Prices must be finite and strictly increasing, values finite, and at least
    /// two points are required.
    pub fn new(prices: Vec<f64>, values: Vec<f64>) -> Result<Self, ApproxError> {
        if prices.len() != values.len() {
            return Err(ApproxError::invalid(format!(
                "payoff table has {} prices but {} values",
                prices.len(),
                values.len()
            )));
        }
        if prices.len() < 2 {
            return Err(ApproxError::invalid("payoff table needs at least 2 rows"));
        }
        if prices.iter().chain(&values).any(|v| !v.is_finite()) {
            return Err(ApproxError::invalid("payoff table contains non-finite numbers"));
        }
        if prices.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ApproxError::invalid("payoff table prices must be strictly increasing"));
        }
        Ok(Self { prices, values })
    }

    /// Tabulated price range `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.prices[0], self.prices[self.prices.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl TargetPayoff for TabulatedPayoff {
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError> {
        let (lo, hi) = self.range();
        if !(s >= lo && s <= hi) {
            return Err(ApproxError::evaluation(
                s,
                format!("outside tabulated range [{lo}, {hi}]"),
            ));
        }
        // First index with price >= s; s is within range so idx < len.
        let idx = self.prices.partition_point(|&p| p < s);
        if self.prices[idx] == s {
            return Ok(self.values[idx]);
        }
        let (x0, x1) = (self.prices[idx - 1], self.prices[idx]);
        let (y0, y1) = (self.values[idx - 1], self.values[idx]);
        let u = (s - x0) / (x1 - x0);
        Ok(y0 + u * (y1 - y0))
    }
}

/// Load a payoff table from a CSV file.
pub fn load_payoff_table(path: &Path) -> Result<TabulatedPayoff, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open payoff CSV '{}': {e}", path.display())))?;
    read_payoff_table(file).map_err(|e| AppError::new(2, format!("Invalid payoff CSV '{}': {e}", path.display())))
}

/// Parse a payoff table from any CSV source.
pub fn read_payoff_table<R: Read>(source: R) -> Result<TabulatedPayoff, ApproxError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| ApproxError::invalid(format!("failed to read CSV headers: {e}")))?
        .clone();
    let (price_idx, payoff_idx) = resolve_columns(&headers)?;

    let mut prices = Vec::new();
    let mut values = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header row.
        let line = idx + 2;
        let record = result.map_err(|e| ApproxError::invalid(format!("line {line}: CSV parse error: {e}")))?;
        prices.push(parse_field(&record, price_idx, line)?);
        values.push(parse_field(&record, payoff_idx, line)?);
    }

    TabulatedPayoff::new(prices, values)
}

fn resolve_columns(headers: &StringRecord) -> Result<(usize, usize), ApproxError> {
    if headers.len() < 2 {
        return Err(ApproxError::invalid("payoff CSV needs at least two columns"));
    }
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase(), idx))
        .collect();
    let find = |names: &[&str]| names.iter().find_map(|n| map.get(*n).copied());

    match (find(&PRICE_COLUMNS), find(&PAYOFF_COLUMNS)) {
        (Some(p), Some(v)) => Ok((p, v)),
        (None, None) => Ok((0, 1)),
        _ => Err(ApproxError::invalid(
            "payoff CSV must name both a price column (price/s/spot) and a payoff column (payoff/value/target)",
        )),
    }
}

fn parse_field(record: &StringRecord, idx: usize, line: usize) -> Result<f64, ApproxError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| ApproxError::invalid(format!("line {line}: missing column {}", idx + 1)))?;
    raw.parse::<f64>()
        .map_err(|e| ApproxError::invalid(format!("line {line}: invalid number '{raw}': {e}")))
}
