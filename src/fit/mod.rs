//! Fitting engine.
//!
//! Responsibilities:
//!
//! - discretize the price domain (`price_grid`)
//! - sample basis and target into `A`, `b` (`design`)
//! - solve under one of three objectives (`solver`, `lasso`, `weighted`)
//! - tie it together per run and across methods (`approximate`)

pub mod approximate;
pub mod design;
pub mod lasso;
pub mod price_grid;
pub mod solver;
pub mod weighted;

pub use approximate::*;
pub use design::*;
pub use lasso::*;
pub use price_grid::*;
pub use solver::*;
pub use weighted::*;
