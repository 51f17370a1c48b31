//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Crate-neutral errors from pricing operations
//! - `SolverError`: Errors from root-finding solvers
//! - `BroadcastError`: Shape errors from scalar-or-array broadcasting

use std::fmt;
use thiserror::Error;

/// Categorised pricing errors.
///
/// Every module-level error in the workspace converts into this type so
/// that callers can propagate failures across layers with `?`.
///
/// # Variants
/// - `InvalidInput`: Invalid market data or parameters
/// - `NumericalInstability`: Computation failed to converge
/// - `ModelFailure`: Model assumptions violated
/// - `UnsupportedInstrument`: Instrument type not supported by model
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative volatility".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative volatility");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    InvalidInput(String),

    /// Numerical instability during computation
    NumericalInstability(String),

    /// Model failed to produce valid result
    ModelFailure(String),

    /// Instrument type not supported
    UnsupportedInstrument(String),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PricingError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            PricingError::ModelFailure(msg) => write!(f, "Model failure: {}", msg),
            PricingError::UnsupportedInstrument(msg) => {
                write!(f, "Unsupported instrument: {}", msg)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Root-finding solver errors.
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::NoBracket { a: 0.0, b: 1.0 };
/// assert!(format!("{}", err).contains("same sign"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The objective produced a non-finite value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        PricingError::NumericalInstability(err.to_string())
    }
}

/// Broadcasting errors.
///
/// Raised when scalar-or-array operands cannot be aligned to one common
/// length, or when an element index falls outside an array operand.
///
/// # Examples
/// ```
/// use pricer_core::types::BroadcastError;
///
/// let err = BroadcastError::ShapeMismatch { expected: 3, found: 2 };
/// assert_eq!(format!("{}", err), "Shape mismatch: expected length 3, found 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// Two array operands have different lengths.
    #[error("Shape mismatch: expected length {expected}, found {found}")]
    ShapeMismatch {
        /// Length established by the first array operand
        expected: usize,
        /// Length of the offending operand
        found: usize,
    },

    /// Element index outside the array.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },
}

impl From<BroadcastError> for PricingError {
    fn from(err: BroadcastError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================
    // PricingError
    // ==========================================================

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::ModelFailure("d2 undefined".to_string());
        assert_eq!(format!("{}", err), "Model failure: d2 undefined");

        let err = PricingError::UnsupportedInstrument("swaption".to_string());
        assert_eq!(format!("{}", err), "Unsupported instrument: swaption");
    }

    #[test]
    fn test_pricing_error_is_std_error() {
        let err = PricingError::InvalidInput("x".to_string());
        let _: &dyn std::error::Error = &err;
    }

    // ==========================================================
    // SolverError / BroadcastError conversions
    // ==========================================================

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::MaxIterationsExceeded { iterations: 100 };
        assert_eq!(format!("{}", err), "Failed to converge after 100 iterations");
    }

    #[test]
    fn test_solver_error_into_pricing_error() {
        let err: PricingError = SolverError::NoBracket { a: 1.0, b: 2.0 }.into();
        assert!(matches!(err, PricingError::NumericalInstability(_)));
    }

    #[test]
    fn test_broadcast_error_into_pricing_error() {
        let err: PricingError = BroadcastError::IndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(
            format!("{}", err),
            "Invalid input: Index 4 out of range for length 2"
        );
    }
}
