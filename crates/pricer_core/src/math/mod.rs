//! Numerical building blocks.
//!
//! - [`select`]: element-wise conditional selection over broadcast values
//! - [`solvers`]: bracketed root finding

pub mod select;
pub mod solvers;

pub use select::select;
