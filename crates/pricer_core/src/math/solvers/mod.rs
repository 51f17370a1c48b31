//! Root-finding solvers for numerical computation.
//!
//! Pricing inversions in this workspace (implied volatility, implied asset
//! value) are solved with [`BrentSolver`], a bracketed method that needs no
//! derivatives and cannot leave a sign-changing interval.
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries:
//! - `tolerance`: absolute tolerance on the root (default: 2e-12)
//! - `rel_tolerance`: relative tolerance on the root (default: 4·ε)
//! - `max_iterations`: maximum iteration count (default: 100)
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x.exp() - 2.0, 0.0, 1.0).unwrap();
//! assert!((root - 2.0_f64.ln()).abs() < 1e-10);
//! ```

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
