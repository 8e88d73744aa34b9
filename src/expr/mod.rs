
//! Terms, expressions, and the constraint equations built from them.

pub mod equation;
pub mod expression;
pub mod source;
pub mod term;

pub use equation::{Equation, build_equation, canonicalize};
pub use expression::Expression;
pub use source::{SourceRef, SourceKind};
pub use term::{Term, TermKind};
