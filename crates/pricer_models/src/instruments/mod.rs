//! Instrument definitions priced from the generalised Black-Scholes model.
//!
//! This module provides:
//! - [`InstrumentType`]: the closed taxonomy (call, put, bond, forward, exposure)
//! - [`Instrument`]: one instrument, dispatched by pattern match
//! - [`InstrumentBatch`]: many instruments over broadcast inputs, dispatched
//!   element-wise with type masks
//!
//! Calls and puts delegate to [`GeneralisedBlackScholes`](crate::analytical::GeneralisedBlackScholes).
//! Bonds, forwards and exposures use their own closed forms; every
//! volatility and curvature sensitivity of a non-option is zero.
//!
//! # Examples
//! ```
//! use pricer_models::analytical::OptionParams;
//! use pricer_models::instruments::Instrument;
//!
//! let params = OptionParams::default().with_ttm(1.0);
//! let forward = Instrument::forward(params).unwrap();
//! assert_eq!(forward.gamma(), 0.0);
//! assert_eq!(forward.delta_driftless(), 1.0);
//! ```

mod batch;
mod error;
mod instrument;
mod instrument_type;

pub use batch::{BatchParams, InstrumentBatch};
pub use error::InstrumentError;
pub use instrument::Instrument;
pub use instrument_type::InstrumentType;
