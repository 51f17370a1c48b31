//! # Pricer Models (L2: Business Logic)
//!
//! Closed-form pricing, instruments and structural credit calibration.
//!
//! This crate provides:
//! - The generalised Black-Scholes model with Greeks up to third order
//! - Implied volatility by bracketed root finding
//! - Calls, puts, zero-coupon bonds, forwards and exposures, singly or as
//!   vectorised batches over broadcast inputs
//! - Merton model calibration of asset value and asset volatility
//!
//! ## Design Principles
//!
//! - **Enum-based instruments** dispatched by pattern match; boolean masks
//!   only where a batch mixes instrument types
//! - **Immutable snapshots**: every input change rebuilds the derived state
//! - **Row-scoped errors**: one failing calibration row never aborts a batch
//!
//! ## Example
//!
//! ```
//! use pricer_models::analytical::{Measure, OptionParams};
//! use pricer_models::instruments::Instrument;
//!
//! let call = Instrument::call(OptionParams::default()).unwrap();
//! assert!((call.value() - 2.423056836).abs() < 1e-8);
//! assert!(call.measure(Measure::Gamma) > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod calibration;
pub mod instruments;
