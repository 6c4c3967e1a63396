//! Mathematical utilities: option payoffs, the basis builder and least squares.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
