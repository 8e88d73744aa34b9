
use crate::expr::SourceRef;
use crate::units::DivisionByZeroExponentError;
use crate::util::matrix::MatrixIndex;

use thiserror::Error;

use std::fmt::{self, Formatter, Display};

/// Failures of equation processing and solving. Inconsistent or
/// underdetermined systems are not errors; they are reported through
/// [`Classification`](crate::solver::Classification).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SolverError {
  #[error("Equation from {origin} does not reduce to a single unit: {equation}")]
  MalformedEquation { origin: SourceRef, equation: String },
  #[error("Canonical equation from {origin} has a right-hand side that is not a single unit")]
  NonUnitRightHandSide { origin: SourceRef },
  #[error("Canonical equation from {origin} has a non-variable term on the left-hand side")]
  NonVariableLeftHandSide { origin: SourceRef },
  #[error("Equation from {origin} mentions unknown variable '{variable}'")]
  UnknownVariable { origin: SourceRef, variable: String },
  #[error("Zero exponent at pivot {pivot}")]
  ZeroPivotExponent { pivot: MatrixIndex },
  #[error("{0}")]
  DivisionByZeroExponent(#[from] DivisionByZeroExponentError),
  #[error("Search truncated after exploring {explored} states ({limit})")]
  SearchTruncated { limit: SearchLimit, explored: usize },
}

/// The search limit that stopped a branching search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
  MaxDepth(usize),
  MaxSolutions(usize),
}

impl Display for SearchLimit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      SearchLimit::MaxDepth(n) => write!(f, "maximum depth {}", n),
      SearchLimit::MaxSolutions(n) => write!(f, "maximum of {} solutions", n),
    }
  }
}
