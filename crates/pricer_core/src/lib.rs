//! # pricer_core: Numerical Foundation for the Analytic Pricing Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Scalar-or-array broadcast values (`types::broadcast`)
//! - Element-wise conditional selection (`math::select`)
//! - Bracketed root finding (`math::solvers`)
//! - Error types: `PricingError`, `SolverError`, `BroadcastError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::select;
//! use pricer_core::math::solvers::{BrentSolver, SolverConfig};
//! use pricer_core::types::Broadcast;
//!
//! let mask = Broadcast::from(vec![true, false]);
//! let picked = select(&mask, &Broadcast::from(1.0), &Broadcast::from(0.0)).unwrap();
//! assert_eq!(picked, Broadcast::from(vec![1.0, 0.0]));
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 4.0, 0.0, 5.0).unwrap();
//! # assert!((root - 2.0).abs() < 1e-10);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `Broadcast` and `SolverConfig`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
