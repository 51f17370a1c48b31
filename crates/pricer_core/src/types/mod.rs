//! Core value and error types.
//!
//! This module provides:
//! - `broadcast`: Scalar-or-array values with length broadcasting
//! - `error`: Structured error types for pricing, solver and broadcast operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Broadcast`], [`common_len`] from `broadcast`
//! - [`PricingError`], [`SolverError`], [`BroadcastError`] from `error`

pub mod broadcast;
pub mod error;

pub use broadcast::{common_len, Broadcast};
pub use error::{BroadcastError, PricingError, SolverError};
