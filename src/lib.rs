
// The #[non_exhaustive] attribute applies at the crate-level, and I
// want module-level restrictions, which are far stricter.
#![allow(clippy::manual_non_exhaustive)]

//! Dimensional-consistency checking for networks of unit constraints.
//!
//! Constraints are built as [`Equation`](expr::Equation)s over
//! [`Unit`](units::Unit)s and named variables, then handed to a
//! [`Solution`](solver::Solution), which eliminates variables one
//! pivot at a time and classifies what remains.

pub mod config;
pub mod error;
pub mod expr;
pub mod solver;
pub mod units;
pub mod util;

pub use config::SolverConfig;
pub use error::SolverError;
pub use solver::{Solution, Classification};
