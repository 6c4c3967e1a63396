//! Target payoffs.
//!
//! A target is any function of the underlying price that the engine should
//! replicate. Evaluation is fallible: a target may be undefined at some prices,
//! and that failure is reported to the caller as-is.

use std::f64::consts::PI;

use crate::domain::TargetKind;
use crate::error::ApproxError;
use crate::math::{call_payoff, put_payoff};

/// A payoff to approximate.
pub trait TargetPayoff {
    /// Payoff at underlying price `s`.
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError>;
}

impl<T: TargetPayoff + ?Sized> TargetPayoff for &T {
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError> {
        (**self).evaluate(s)
    }
}

impl<T: TargetPayoff + ?Sized> TargetPayoff for Box<T> {
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError> {
        (**self).evaluate(s)
    }
}

/// Adapter for plain closures.
///
/// A non-finite output (NaN, ±∞) is treated as "undefined at this price".
#[derive(Debug, Clone, Copy)]
pub struct PayoffFn<F>(pub F);

impl<F> TargetPayoff for PayoffFn<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError> {
        let v = (self.0)(s);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(ApproxError::evaluation(s, format!("payoff is undefined ({v})")))
        }
    }
}

/// Built-in payoff shapes, parameterized by a center strike and a wing width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogPayoff {
    pub kind: TargetKind,
    pub center: f64,
    pub width: f64,
}

impl CatalogPayoff {
    pub fn new(kind: TargetKind, center: f64, width: f64) -> Result<Self, ApproxError> {
        if !center.is_finite() {
            return Err(ApproxError::invalid(format!("target center must be finite, got {center}")));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(ApproxError::invalid(format!("target width must be > 0, got {width}")));
        }
        Ok(Self { kind, center, width })
    }

    fn value(&self, s: f64) -> f64 {
        let k = self.center;
        let w = self.width;
        match self.kind {
            TargetKind::Sample => sample_payoff(s),
            TargetKind::Call => call_payoff(s, k),
            TargetKind::Put => put_payoff(s, k),
            TargetKind::Straddle => call_payoff(s, k) + put_payoff(s, k),
            TargetKind::Butterfly => {
                call_payoff(s, k - w) - 2.0 * call_payoff(s, k) + call_payoff(s, k + w)
            }
            TargetKind::Digital => {
                if s >= k {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl TargetPayoff for CatalogPayoff {
    fn evaluate(&self, s: f64) -> Result<f64, ApproxError> {
        let v = self.value(s);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(ApproxError::evaluation(s, "payoff is undefined"))
        }
    }
}

/// The piecewise demonstration payoff.
///
/// ```text
/// S < 80         0.5 (S - 70)
/// 80 ≤ S < 100   10 sin(π (S - 80) / 20) + 5
/// 100 ≤ S < 120  0.8 (120 - S)^1.5
/// S ≥ 120        0
/// ```
///
/// plus a constant 15 everywhere.
pub fn sample_payoff(s: f64) -> f64 {
    let base = if s < 80.0 {
        0.5 * (s - 70.0)
    } else if s < 100.0 {
        ((s - 80.0) / 20.0 * PI).sin() * 10.0 + 5.0
    } else if s < 120.0 {
        0.8 * (120.0 - s).powf(1.5)
    } else {
        0.0
    };
    base + 15.0
}
