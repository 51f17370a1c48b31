//! Instrument error types.
//!
//! This module provides structured error handling for instrument
//! construction, type decoding and batch shape checks.

use pricer_core::types::{BroadcastError, PricingError};
use thiserror::Error;

use crate::analytical::AnalyticalError;

/// Instrument-related errors.
///
/// # Variants
/// - `UnknownTypeCode`: Integer code outside the instrument taxonomy
/// - `UnknownTypeName`: Name outside the instrument taxonomy
/// - `Analytical`: Inputs rejected by the pricing model
/// - `Shape`: Batch fields cannot be broadcast together
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::UnknownTypeCode { code: 7 };
/// assert_eq!(format!("{}", err), "Unknown instrument type code: 7");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Integer code that names no instrument type.
    #[error("Unknown instrument type code: {code}")]
    UnknownTypeCode {
        /// The rejected code
        code: i32,
    },

    /// String that names no instrument type.
    #[error("Unknown instrument type: {name}")]
    UnknownTypeName {
        /// The rejected name
        name: String,
    },

    /// Inputs rejected by the pricing model.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Batch fields cannot be broadcast together.
    #[error("Batch shape error: {0}")]
    Shape(#[from] BroadcastError),
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::UnknownTypeCode { .. } | InstrumentError::UnknownTypeName { .. } => {
                PricingError::UnsupportedInstrument(err.to_string())
            }
            InstrumentError::Analytical(inner) => inner.into(),
            InstrumentError::Shape(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_display() {
        let err = InstrumentError::UnknownTypeName {
            name: "swaption".to_string(),
        };
        assert_eq!(format!("{}", err), "Unknown instrument type: swaption");
    }

    #[test]
    fn test_analytical_is_transparent() {
        let err: InstrumentError = AnalyticalError::InvalidExpiry { ttm: -1.0 }.into();
        assert_eq!(format!("{}", err), "Invalid time to maturity: ttm = -1");
    }

    #[test]
    fn test_conversion_to_pricing_error() {
        let err: PricingError = InstrumentError::UnknownTypeCode { code: 0 }.into();
        assert!(matches!(err, PricingError::UnsupportedInstrument(_)));

        let err: PricingError =
            InstrumentError::from(BroadcastError::ShapeMismatch { expected: 2, found: 3 }).into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
