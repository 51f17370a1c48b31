//! Calibration error types.
//!
//! Errors are scoped to one input row: a failed row never aborts the
//! other rows of a batch.

use pricer_core::types::{BroadcastError, PricingError, SolverError};
use thiserror::Error;

use crate::analytical::AnalyticalError;

/// Merton calibration errors.
///
/// # Examples
/// ```
/// use pricer_models::calibration::MertonError;
///
/// let err = MertonError::MissingMarketValue;
/// assert!(format!("{}", err).contains("equity value"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MertonError {
    /// Assets and asset volatility are both unknown and one side of the
    /// capital structure is missing.
    #[error(
        "When neither assets nor asset volatility is provided, both equity value \
         and debt value/YTM/credit spread are required"
    )]
    MissingAssetsAndVolatility,

    /// Assets or asset volatility is unknown and no market value is given.
    #[error("Please supply either equity value or debt value/YTM/credit spread")]
    MissingMarketValue,

    /// An input outside its domain.
    #[error("Invalid {field}: {value}")]
    InvalidInput {
        /// Name of the input
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Root finding failed for an unknown.
    #[error("Failed to solve for {quantity}: {source}")]
    Solver {
        /// The unknown being solved for
        quantity: &'static str,
        /// Underlying root-finder failure
        #[source]
        source: SolverError,
    },

    /// Pricing model rejected the resolved inputs.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Table columns have unequal lengths.
    #[error("Input contains columns of unequal lengths: {0}")]
    UnequalLengths(#[from] BroadcastError),
}

impl From<MertonError> for PricingError {
    fn from(err: MertonError) -> Self {
        match err {
            MertonError::Solver { .. } => PricingError::ModelFailure(err.to_string()),
            MertonError::Analytical(inner) => inner.into(),
            _ => PricingError::InvalidInput(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_display() {
        let err = MertonError::Solver {
            quantity: "asset value",
            source: SolverError::NoBracket { a: 1.0, b: 2.0 },
        };
        assert!(format!("{}", err).starts_with("Failed to solve for asset value"));
    }

    #[test]
    fn test_conversion_to_pricing_error() {
        let err: PricingError = MertonError::MissingMarketValue.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));

        let err: PricingError = MertonError::Solver {
            quantity: "asset volatility",
            source: SolverError::MaxIterationsExceeded { iterations: 100 },
        }
        .into();
        assert!(matches!(err, PricingError::ModelFailure(_)));
    }
}
