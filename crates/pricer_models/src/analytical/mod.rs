//! Analytical pricing formulas for European options.
//!
//! This module provides closed-form solutions under lognormal dynamics with
//! constant volatility and rates:
//! - Generalised Black-Scholes value, payoff and profit
//! - Analytical Greeks up to third order (Color)
//! - Implied volatility by bracketed root finding
//!
//! ## Design Principles
//!
//! - **Immutable snapshots**: inputs and derived quantities are rebuilt
//!   together, never updated one field at a time
//! - **Explicit degenerate policy**: d₂ and Gamma resolve to 0 at
//!   σ√ttm = 0; unresolved limits stay NaN
//! - **Numerical Stability**: Uses erfc-based CDF for accuracy

pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod implied;
pub mod measure;
pub mod params;

// Re-export main types at module level
pub use black_scholes::GeneralisedBlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use implied::{implied_volatility, VOLATILITY_LOWER, VOLATILITY_UPPER};
pub use measure::Measure;
pub use params::{OptionParams, OptionType, Variable};
