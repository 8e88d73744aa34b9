
use super::term::{Term, TermKind};
use crate::units::Unit;
use crate::util::{into_singleton, partition_mapped};

use either::Either;
use itertools::Itertools;

use std::fmt::{self, Formatter, Display};
use std::ops::Mul;

/// An ordered product of [`Term`]s. Term order never changes the
/// value of the product, but it is preserved so that output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
  terms: Vec<Term>,
}

impl Expression {
  pub fn new(terms: impl IntoIterator<Item = Term>) -> Self {
    Self { terms: terms.into_iter().collect() }
  }

  pub fn from_unit(unit: Unit) -> Self {
    Self::new([Term::from_unit(unit)])
  }

  pub fn from_variable(name: impl Into<String>) -> Self {
    Self::new([Term::from_variable(name)])
  }

  pub fn push(&mut self, term: Term) {
    self.terms.push(term);
  }

  pub fn terms(&self) -> &[Term] {
    &self.terms
  }

  pub fn into_terms(self) -> Vec<Term> {
    self.terms
  }

  pub fn len(&self) -> usize {
    self.terms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.terms.is_empty()
  }

  /// True if no term wraps a nested expression.
  pub fn is_flat(&self) -> bool {
    self.terms.iter().all(|term| term.as_expression().is_none())
  }

  /// Inlines every nested expression, at any depth. The exponent of a
  /// wrapping term multiplies the exponents of the terms it wraps.
  pub fn flatten(&self) -> Expression {
    let mut terms = Vec::with_capacity(self.terms.len());
    self.flatten_into(1, &mut terms);
    Expression { terms }
  }

  fn flatten_into(&self, outer_exponent: i64, out: &mut Vec<Term>) {
    for term in &self.terms {
      let exponent = term.exponent() * outer_exponent;
      match term.kind() {
        TermKind::Expression(inner) => inner.flatten_into(exponent, out),
        TermKind::Unit(_) | TermKind::Variable(_) => out.push(term.clone().with_exponent(exponent)),
      }
    }
  }

  /// Flattens the expression and folds all of its literal units into
  /// a single unit term, which is placed after the variable terms.
  /// The variable terms keep their original order. An expression with
  /// no literal units gains no unit term.
  pub fn reduce(&self) -> Expression {
    let (mut terms, units): (Vec<Term>, Vec<Unit>) = partition_mapped(self.flatten().terms, |term| {
      match term.unit_value() {
        Some(unit) => Either::Right(unit),
        None => Either::Left(term),
      }
    });
    if let Some(unit) = units.into_iter().reduce(|acc, unit| acc.multiply(&unit)) {
      terms.push(Term::from_unit(unit));
    }
    Expression { terms }
  }

  /// The unit this expression denotes, if it consists of exactly one
  /// unit term.
  pub fn single_unit(&self) -> Option<Unit> {
    into_singleton(&self.terms).and_then(Term::unit_value)
  }

  pub fn invert(&self) -> Expression {
    Expression { terms: self.terms.iter().map(Term::invert).collect() }
  }

  /// Names of the variables mentioned directly by this expression's
  /// terms, in order, with repeats. Nested expressions are not
  /// searched; flatten first for that.
  pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
    self.terms.iter().filter_map(Term::as_variable)
  }

  pub fn descriptive_form(&self) -> String {
    if self.terms.is_empty() {
      String::from("1")
    } else {
      self.terms.iter().map(Term::descriptive_form).join(" * ")
    }
  }
}

impl From<Term> for Expression {
  fn from(term: Term) -> Self {
    Expression { terms: vec![term] }
  }
}

impl FromIterator<Term> for Expression {
  fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
    Expression::new(iter)
  }
}

impl Extend<Term> for Expression {
  fn extend<I: IntoIterator<Item = Term>>(&mut self, iter: I) {
    self.terms.extend(iter);
  }
}

impl Mul for Expression {
  type Output = Expression;

  fn mul(mut self, rhs: Expression) -> Expression {
    self.terms.extend(rhs.terms);
    self
  }
}

impl Display for Expression {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    if self.terms.is_empty() {
      write!(f, "1")
    } else {
      write!(f, "{}", self.terms.iter().join(" * "))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::test_utils::{meters, seconds, kilometers, minutes};

  use approx::assert_relative_eq;

  fn var(name: &str, exponent: i64) -> Term {
    Term::from_variable(name).with_exponent(exponent)
  }

  #[test]
  fn test_flatten_nested() {
    // x * (y * (z^2))^-1
    let innermost = Expression::new([var("z", 2)]);
    let inner = Expression::new([var("y", 1), Term::from_expression(innermost)]);
    let expr = Expression::new([var("x", 1), Term::from_expression(inner).with_exponent(-1)]);
    assert!(!expr.is_flat());
    let flat = expr.flatten();
    assert!(flat.is_flat());
    assert_eq!(flat, Expression::new([var("x", 1), var("y", -1), var("z", -2)]));
  }

  #[test]
  fn test_flatten_is_idempotent() {
    let inner = Expression::new([var("y", 1), Term::from_unit(meters())]);
    let expr = Expression::new([Term::from_expression(inner).with_exponent(3)]);
    let flat = expr.flatten();
    assert_eq!(flat.flatten(), flat);
  }

  #[test]
  fn test_reduce_folds_units() {
    let expr = Expression::new([
      Term::from_unit(kilometers()),
      var("v", 1),
      Term::from_unit(minutes()).with_exponent(-1),
      var("w", -2),
    ]);
    let reduced = expr.reduce();
    assert_eq!(reduced.len(), 3);
    assert_eq!(reduced.terms()[0], var("v", 1));
    assert_eq!(reduced.terms()[1], var("w", -2));
    let unit = reduced.terms()[2].as_unit().unwrap();
    assert_eq!(reduced.terms()[2].exponent(), 1);
    assert_relative_eq!(*unit, Unit::from_integers(1000.0 / 60.0, &[1, -1]));
  }

  #[test]
  fn test_reduce_leaves_at_most_one_unit() {
    let expr = Expression::new([
      Term::from_unit(meters()),
      Term::from_expression(Expression::new([Term::from_unit(seconds()), var("x", 1)])),
      Term::from_unit(meters()).with_exponent(-1),
    ]);
    let reduced = expr.reduce();
    assert_eq!(reduced.terms().iter().filter(|t| t.is_unit()).count(), 1);
    assert_eq!(reduced.variables().collect::<Vec<_>>(), vec!["x"]);
  }

  #[test]
  fn test_reduce_without_units() {
    let expr = Expression::new([var("x", 1), var("y", -1)]);
    assert_eq!(expr.reduce(), expr);
  }

  #[test]
  fn test_reduce_single_unit_keeps_label() {
    let reduced = Expression::from_unit(meters()).reduce();
    assert_eq!(reduced.to_string(), "m");
  }

  #[test]
  fn test_single_unit() {
    assert_eq!(Expression::from_unit(meters()).single_unit(), Some(meters()));
    let squared = Expression::new([Term::from_unit(meters()).with_exponent(2)]);
    assert_eq!(squared.single_unit(), Some(Unit::from_integers(1.0, &[2])));
    assert_eq!(Expression::from_variable("x").single_unit(), None);
    assert_eq!(Expression::new([Term::from_unit(meters()), Term::from_unit(seconds())]).single_unit(), None);
    assert_eq!(Expression::default().single_unit(), None);
  }

  #[test]
  fn test_invert() {
    let expr = Expression::new([var("x", 2), Term::from_unit(seconds())]);
    assert_eq!(expr.invert(), Expression::new([var("x", -2), Term::from_unit(seconds()).with_exponent(-1)]));
  }

  #[test]
  fn test_mul_concatenates() {
    let product = Expression::from_variable("x") * Expression::from_unit(meters());
    assert_eq!(product.len(), 2);
    assert_eq!(product.to_string(), "x * m");
  }

  #[test]
  fn test_display() {
    assert_eq!(Expression::default().to_string(), "1");
    let expr = Expression::new([var("x", 1), var("y", -1)]);
    assert_eq!(expr.to_string(), "x * y^-1");
  }
}
