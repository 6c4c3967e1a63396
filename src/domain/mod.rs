//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the basis vocabulary (`BasisFunction`, `ParityMode`)
//! - fitting configuration (`FitMethod`, `GridConfig`, `SolverOptions`, `ApproxConfig`)
//! - fit outputs (`FitResult`, `MethodFit`, `Position`, `FitReport`)
//! - driver configuration (`RunConfig`, `TargetSpec`)

pub mod types;

pub use types::*;
