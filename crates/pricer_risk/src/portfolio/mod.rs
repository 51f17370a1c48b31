//! Weighted portfolios of instruments.
//!
//! This module provides:
//! - [`OptionPortfolio`]: legs with signed weights; every portfolio
//!   quantity is the weighted sum of the per-leg quantity
//! - [`PortfolioError`]: construction and update failures
//!
//! Long positions carry positive weights and short positions negative ones.

mod aggregator;
mod error;

pub use aggregator::OptionPortfolio;
pub use error::PortfolioError;
