
use super::expression::Expression;
use super::source::SourceRef;
use super::term::Term;
use crate::error::SolverError;
use crate::units::Unit;
use crate::util::partition_mapped;

use either::Either;

use std::fmt::{self, Formatter, Display};

/// A constraint `lhs = rhs` between two expressions, tagged with the
/// diagram element it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
  lhs: Expression,
  rhs: Expression,
  source: SourceRef,
}

/// Builds an equation from its two sides.
pub fn build_equation(lhs: Expression, rhs: Expression, source: SourceRef) -> Equation {
  Equation::new(lhs, rhs, source)
}

/// Rewrites the equation into canonical form. See
/// [`Equation::canonicalize`].
pub fn canonicalize(equation: &Equation) -> Result<Equation, SolverError> {
  equation.canonicalize()
}

impl Equation {
  pub const OPERATOR: &'static str = "=";

  pub fn new(lhs: Expression, rhs: Expression, source: SourceRef) -> Self {
    Self { lhs, rhs, source }
  }

  pub fn lhs(&self) -> &Expression {
    &self.lhs
  }

  pub fn rhs(&self) -> &Expression {
    &self.rhs
  }

  pub fn source(&self) -> &SourceRef {
    &self.source
  }

  pub fn into_parts(self) -> (Expression, Expression, SourceRef) {
    (self.lhs, self.rhs, self.source)
  }

  /// True if the left-hand side consists only of variable terms and
  /// the right-hand side is a single literal unit term.
  pub fn is_canonical(&self) -> bool {
    self.lhs.terms().iter().all(Term::is_variable) &&
      self.rhs.len() == 1 &&
      self.rhs.terms()[0].is_unit() &&
      self.rhs.terms()[0].exponent() == 1
  }

  /// Rewrites the equation as `(product of variables) = (single unit)`.
  ///
  /// Both sides are flattened first. Unit terms on the left move to the
  /// right inverted, and variable terms on the right move to the left
  /// inverted. Variable terms are not combined here, so a variable may
  /// appear more than once on the result's left-hand side. The
  /// right-hand side is reduced to one unit term, which is the identity
  /// if no units were present.
  ///
  /// Canonicalizing a canonical equation yields an equal equation.
  pub fn canonicalize(&self) -> Result<Equation, SolverError> {
    let (mut lhs, mut rhs): (Vec<Term>, Vec<Term>) = partition_mapped(self.lhs.flatten().into_terms(), |term| {
      if term.is_unit() {
        Either::Right(term.invert())
      } else {
        Either::Left(term)
      }
    });
    let (rhs_variables, rhs_units): (Vec<Term>, Vec<Term>) = partition_mapped(self.rhs.flatten().into_terms(), |term| {
      if term.is_unit() {
        Either::Right(term)
      } else {
        Either::Left(term.invert())
      }
    });
    lhs.extend(rhs_variables);
    rhs.extend(rhs_units);
    if rhs.is_empty() {
      rhs.push(Term::from_unit(Unit::IDENTITY));
    }

    let rhs = Expression::new(rhs).reduce();
    if rhs.single_unit().is_none() {
      return Err(SolverError::MalformedEquation {
        origin: self.source.clone(),
        equation: self.to_string(),
      });
    }
    Ok(Equation::new(Expression::new(lhs), rhs, self.source.clone()))
  }

  /// Renders the equation with literal units in descriptive form.
  pub fn descriptive_form(&self) -> String {
    format!("{} {} {}", self.lhs.descriptive_form(), Self::OPERATOR, self.rhs.descriptive_form())
  }
}

impl Display for Equation {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} {} {}", self.lhs, Self::OPERATOR, self.rhs)
  }
}
