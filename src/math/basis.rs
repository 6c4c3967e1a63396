//! Vanilla option payoffs and the replication basis.
//!
//! - `call(S, K) = max(S - K, 0)`
//! - `put(S, K)  = max(K - S, 0)`
//!
//! Both are continuous at the money, and they satisfy put-call parity:
//! `put(S, K) = call(S, K) - (S - K)`.

use crate::domain::{BasisFunction, ParityMode};

/// Call payoff at maturity.
pub fn call_payoff(s: f64, strike: f64) -> f64 {
    (s - strike).max(0.0)
}

/// Put payoff at maturity.
pub fn put_payoff(s: f64, strike: f64) -> f64 {
    (strike - s).max(0.0)
}

/// Build the ordered list of basis payoffs for `strikes`.
///
/// For each strike, in input order, a call is emitted; with parity off the put at
/// the same strike follows immediately. With parity on, a single unit spot
/// position is appended after all strikes.
///
/// An empty strike list is accepted (yielding an empty or spot-only basis).
pub fn build_basis(strikes: &[f64], parity: ParityMode) -> Vec<BasisFunction> {
    let mut basis = Vec::with_capacity(strikes.len() * parity.columns_per_strike() + 1);
    for &strike in strikes {
        basis.push(BasisFunction::Call { strike });
        if !parity.is_on() {
            basis.push(BasisFunction::Put { strike });
        }
    }
    if parity.is_on() {
        basis.push(BasisFunction::Spot);
    }
    basis
}
