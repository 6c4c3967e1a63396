//! Error types.
//!
//! The library surfaces `ApproxError`; the binary converts it into an `AppError`
//! that carries a process exit code.

use thiserror::Error;

/// Errors raised by the approximation engine.
///
/// Solver non-convergence is not an error: capped solvers return their best
/// iterate.
#[derive(Debug, Clone, Error)]
pub enum ApproxError {
    /// Bad caller input (unknown method, negative regularization, spot <= 0, ...).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The target payoff could not be evaluated at a required price.
    #[error("target payoff evaluation failed at S={price}: {message}")]
    Evaluation { price: f64, message: String },

    /// A linear solve produced non-finite output.
    #[error("numerical error: {message}")]
    Numerical { message: String },
}

impl ApproxError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn evaluation(price: f64, message: impl Into<String>) -> Self {
        Self::Evaluation {
            price,
            message: message.into(),
        }
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// Exit code used by the `replicate` binary for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            ApproxError::InvalidInput { .. } => 2,
            ApproxError::Evaluation { .. } => 3,
            ApproxError::Numerical { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ApproxError> for AppError {
    fn from(err: ApproxError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let invalid: AppError = ApproxError::invalid("spot must be > 0").into();
        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(invalid.to_string(), "invalid input: spot must be > 0");

        let eval: AppError = ApproxError::evaluation(50.0, "undefined").into();
        assert_eq!(eval.exit_code(), 3);

        let num: AppError = ApproxError::numerical("NaN weights").into();
        assert_eq!(num.exit_code(), 4);
    }

    #[test]
    fn evaluation_error_carries_price() {
        match ApproxError::evaluation(42.5, "outside table") {
            ApproxError::Evaluation { price, message } => {
                assert_eq!(price, 42.5);
                assert_eq!(message, "outside table");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }
}
