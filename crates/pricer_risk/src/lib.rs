//! # Pricer Risk
//!
//! Portfolio aggregation and consistency checks on top of `pricer_models`.
//!
//! This crate provides:
//! - Weighted option portfolios with Greeks reduced over the legs
//! - Payoff and profit across terminal-price scenarios
//! - Analytic Greeks checked against central finite differences, on fixed
//!   points or on a random sample
//! - Engine configuration loaded from TOML
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk                  │
//! ├─────────────────────────────────────────┤
//! │  portfolio/    - OptionPortfolio        │
//! │  verification/ - Greek checker          │
//! │  config        - RiskEngineConfig       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_models                 │
//! │  GBS model, instruments, Merton         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_core::types::Broadcast;
//! use pricer_models::analytical::OptionParams;
//! use pricer_models::instruments::Instrument;
//! use pricer_risk::portfolio::OptionPortfolio;
//!
//! let params = OptionParams::default();
//! let call = Instrument::call(params).unwrap();
//! let put = Instrument::put(params).unwrap();
//!
//! // Long call, short put
//! let book = OptionPortfolio::new(vec![call, put], vec![1.0, -1.0]).unwrap();
//!
//! // Synthetic forward: payoff is S_T - K in every scenario
//! let payoff = book.payoff(Some(&Broadcast::from(vec![90.0, 110.0])));
//! assert_eq!(payoff.as_slice(), &[-10.0, 10.0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod portfolio;
pub mod verification;

// Re-export commonly used types
pub use config::{ConfigError, ContractDefaults, LogLevel, RiskEngineConfig};
pub use portfolio::{OptionPortfolio, PortfolioError};
pub use verification::{GreekCheckConfig, GreekConsistencyChecker, SampleSummary};
