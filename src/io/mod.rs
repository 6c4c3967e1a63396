//! Input/output helpers.
//!
//! - payoff table CSV ingest (`table`)
//! - comparison data tables (`export`)
//! - TikZ/pgfplots figure snippets (`tikz`)
//! - fit report JSON read/write (`report_json`)

pub mod export;
pub mod report_json;
pub mod table;
pub mod tikz;

pub use export::*;
pub use report_json::*;
pub use table::*;
pub use tikz::*;
