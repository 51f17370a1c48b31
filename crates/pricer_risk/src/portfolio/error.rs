//! Portfolio error types.
//!
//! This module provides structured error types for portfolio operations
//! using `thiserror` for derivation.

use pricer_core::types::{BroadcastError, PricingError};
use pricer_models::instruments::InstrumentError;
use thiserror::Error;

/// Errors that can occur during portfolio operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Empty portfolio (no legs).
    #[error("Portfolio is empty")]
    EmptyPortfolio,

    /// Weight count differs from leg count.
    #[error("Weight count mismatch: {legs} legs, {weights} weights")]
    WeightMismatch {
        /// Number of legs
        legs: usize,
        /// Number of weights
        weights: usize,
    },

    /// Leg index past the end.
    #[error("Leg index {index} out of range for {len} legs")]
    LegOutOfRange {
        /// Requested leg
        index: usize,
        /// Number of legs
        len: usize,
    },

    /// A leg rejected its inputs.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Per-leg inputs cannot be broadcast over the legs.
    #[error("Portfolio shape error: {0}")]
    Shape(#[from] BroadcastError),
}

impl From<PortfolioError> for PricingError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::Instrument(inner) => inner.into(),
            PortfolioError::Shape(inner) => inner.into(),
            _ => PricingError::InvalidInput(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty() {
        assert_eq!(format!("{}", PortfolioError::EmptyPortfolio), "Portfolio is empty");
    }

    #[test]
    fn test_error_display_weight_mismatch() {
        let err = PortfolioError::WeightMismatch { legs: 2, weights: 3 };
        assert_eq!(format!("{}", err), "Weight count mismatch: 2 legs, 3 weights");
    }

    #[test]
    fn test_error_display_leg_out_of_range() {
        let err = PortfolioError::LegOutOfRange { index: 4, len: 2 };
        assert_eq!(format!("{}", err), "Leg index 4 out of range for 2 legs");
    }

    #[test]
    fn test_conversion_to_pricing_error() {
        let err: PricingError = PortfolioError::EmptyPortfolio.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
