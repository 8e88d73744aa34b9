
//! Elimination and classification of unit constraint systems.
//!
//! A [`Solution`] holds the exponent matrix and unit vector of a
//! system of canonical equations. [`Solution::complete_solution`]
//! eliminates pivots in row order and classifies the result;
//! [`Solution::minimal_span_solutions`] instead branches at every
//! choice of pivot and classifies each independent cluster of
//! constraints on its own.

mod analysis;
mod report;
mod search;
mod solution;
mod system;

pub use analysis::{Classification, ConstraintState, VariableState, AnalysisScope, ConstraintVerdict};
pub use report::{Annotation, AnnotationTarget};
pub use solution::Solution;
pub use system::ConstraintSystem;
