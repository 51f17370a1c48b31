//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors specific to analytical pricing models

use pricer_core::types::{PricingError, SolverError};
use thiserror::Error;

/// Analytical pricing errors.
///
/// Raised when a pricing snapshot is built from inputs outside the domain
/// of the closed-form formulas, or when an implied parameter cannot be
/// recovered.
///
/// Zero volatility and zero time to maturity are inside the domain; they
/// are handled by the degenerate-input policy, not rejected.
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Negative volatility.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Negative time to maturity.
    #[error("Invalid time to maturity: ttm = {ttm}")]
    InvalidExpiry {
        /// The invalid time to maturity
        ttm: f64,
    },

    /// Negative spot price.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Negative strike.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// An input was NaN.
    #[error("Input {parameter} is NaN")]
    NotANumber {
        /// Name of the offending input
        parameter: &'static str,
    },

    /// No volatility reproduces the target price.
    #[error("Implied volatility not found for price {price}: {source}")]
    ImpliedVolatility {
        /// The target option price
        price: f64,
        /// Underlying root-finder failure
        #[source]
        source: SolverError,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::ImpliedVolatility { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
            _ => PricingError::InvalidInput(err.to_string()),
        }
    }
}
