//! `payoff-replicator` library crate.
//!
//! Approximates a target payoff (a function of the underlying price at expiry)
//! with a weighted portfolio of European calls and puts, optionally plus a spot
//! position via put-call parity. Three objectives are supported: ridge (L2),
//! lasso (L1) and a payoff-weighted absolute error.
//!
//! The binary (`replicate`) is a thin wrapper around this library so the core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

