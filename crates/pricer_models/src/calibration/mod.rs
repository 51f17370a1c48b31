//! Structural credit calibration.
//!
//! This module provides the Merton model, which treats equity as a call on
//! the firm's assets:
//! - [`MertonCalibrator`]: recovers asset value or asset volatility from
//!   market observations, row by row or in parallel batches
//! - [`MertonInput`] / [`MertonInputs`]: one row, or a column table of rows
//! - [`MertonOutput`]: resolved capital structure and credit metrics
//! - [`ccrate`] / [`equiv`]: conversions between quoted and continuous rates
//!
//! # Flow
//!
//! ```text
//! quoted rates ──ccrate──► ρ, q, coupon ──► zero-coupon face value
//!                                                  │
//! equity / debt observations ──► Brent root find ──► assets, σA
//!                                                  │
//!                          put on assets ──► debt, yield, spread, PD
//! ```

mod error;
pub mod merton;
mod rates;

pub use error::MertonError;
pub use merton::{MertonCalibrator, MertonConfig, MertonInput, MertonInputs, MertonOutput, ASSET_MULTIPLE_CAP};
pub use rates::{ccrate, equiv, Frequency};
