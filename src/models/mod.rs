//! Payoff models.
//!
//! - `target`: the payoffs being approximated (closures, built-in shapes)
//! - `replication`: evaluating a weighted basis as a replicating portfolio
//!
//! Models are small and pure so that fitting and reporting code can stay generic.

pub mod replication;
pub mod target;

pub use replication::*;
pub use target::*;
