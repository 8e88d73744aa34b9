
use super::expression::Expression;
use crate::units::Unit;

use num::pow::Pow;

use std::fmt::{self, Formatter, Display};

/// One factor of an [`Expression`]: a literal unit, a named variable,
/// or a nested expression, raised to an integer power.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
  kind: TermKind,
  exponent: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
  Unit(Unit),
  Variable(String),
  Expression(Box<Expression>),
}

impl Term {
  pub fn from_unit(unit: Unit) -> Self {
    Self { kind: TermKind::Unit(unit), exponent: 1 }
  }

  pub fn from_variable(name: impl Into<String>) -> Self {
    Self { kind: TermKind::Variable(name.into()), exponent: 1 }
  }

  pub fn from_expression(expr: Expression) -> Self {
    Self { kind: TermKind::Expression(Box::new(expr)), exponent: 1 }
  }

  pub fn with_exponent(mut self, exponent: i64) -> Self {
    self.exponent = exponent;
    self
  }

  pub fn kind(&self) -> &TermKind {
    &self.kind
  }

  pub fn exponent(&self) -> i64 {
    self.exponent
  }

  pub fn into_parts(self) -> (TermKind, i64) {
    (self.kind, self.exponent)
  }

  pub fn as_unit(&self) -> Option<&Unit> {
    match &self.kind {
      TermKind::Unit(unit) => Some(unit),
      _ => None,
    }
  }

  pub fn as_variable(&self) -> Option<&str> {
    match &self.kind {
      TermKind::Variable(name) => Some(name),
      _ => None,
    }
  }

  pub fn as_expression(&self) -> Option<&Expression> {
    match &self.kind {
      TermKind::Expression(expr) => Some(expr),
      _ => None,
    }
  }

  pub fn is_unit(&self) -> bool {
    matches!(self.kind, TermKind::Unit(_))
  }

  pub fn is_variable(&self) -> bool {
    matches!(self.kind, TermKind::Variable(_))
  }

  /// The unit contributed by a unit term, with the exponent applied.
  pub fn unit_value(&self) -> Option<Unit> {
    self.as_unit().map(|unit| unit.powi(self.exponent))
  }

  /// The multiplicative inverse of this term. Unit and variable terms
  /// have their exponent negated; a nested expression is inverted in
  /// place and keeps the outer exponent.
  pub fn invert(&self) -> Term {
    match &self.kind {
      TermKind::Unit(_) | TermKind::Variable(_) => {
        Term { kind: self.kind.clone(), exponent: - self.exponent }
      }
      TermKind::Expression(expr) => {
        Term { kind: TermKind::Expression(Box::new(expr.invert())), exponent: self.exponent }
      }
    }
  }

  /// Like `Display`, but renders literal units in descriptive form
  /// rather than by label.
  pub fn descriptive_form(&self) -> String {
    let base = match &self.kind {
      TermKind::Unit(unit) => unit.descriptive_form(),
      TermKind::Variable(name) => name.clone(),
      TermKind::Expression(expr) => format!("({})", expr.descriptive_form()),
    };
    with_exponent_suffix(base, self.exponent)
  }
}

fn with_exponent_suffix(base: String, exponent: i64) -> String {
  if exponent == 1 {
    base
  } else {
    format!("{}^{}", base, exponent)
  }
}

impl From<Unit> for Term {
  fn from(unit: Unit) -> Self {
    Term::from_unit(unit)
  }
}

impl From<Expression> for Term {
  fn from(expr: Expression) -> Self {
    Term::from_expression(expr)
  }
}

impl Pow<i64> for Term {
  type Output = Term;

  fn pow(mut self, rhs: i64) -> Term {
    self.exponent *= rhs;
    self
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let base = match &self.kind {
      TermKind::Unit(unit) => unit.to_string(),
      TermKind::Variable(name) => name.clone(),
      TermKind::Expression(expr) => format!("({})", expr),
    };
    write!(f, "{}", with_exponent_suffix(base, self.exponent))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::test_utils::{meters, seconds};

  #[test]
  fn test_constructors_default_exponent() {
    assert_eq!(Term::from_unit(meters()).exponent(), 1);
    assert_eq!(Term::from_variable("x").exponent(), 1);
    assert_eq!(Term::from_expression(Expression::default()).exponent(), 1);
  }

  #[test]
  fn test_accessors_are_exclusive() {
    let term = Term::from_variable("x");
    assert_eq!(term.as_variable(), Some("x"));
    assert!(term.as_unit().is_none());
    assert!(term.as_expression().is_none());
    let term = Term::from_unit(meters());
    assert!(term.is_unit());
    assert!(!term.is_variable());
  }

  #[test]
  fn test_invert_unit_and_variable() {
    let term = Term::from_variable("x").with_exponent(2).invert();
    assert_eq!(term, Term::from_variable("x").with_exponent(-2));
    let term = Term::from_unit(meters()).invert();
    assert_eq!(term.exponent(), -1);
    assert_eq!(term.as_unit(), Some(&meters()));
  }

  #[test]
  fn test_invert_nested_expression() {
    let inner = Expression::new([Term::from_variable("x"), Term::from_unit(seconds()).with_exponent(-1)]);
    let term = Term::from_expression(inner).with_exponent(3).invert();
    assert_eq!(term.exponent(), 3);
    assert_eq!(
      term.as_expression(),
      Some(&Expression::new([Term::from_variable("x").with_exponent(-1), Term::from_unit(seconds())])),
    );
  }

  #[test]
  fn test_unit_value_applies_exponent() {
    let term = Term::from_unit(meters()).with_exponent(2);
    assert_eq!(term.unit_value(), Some(Unit::from_integers(1.0, &[2])));
    assert_eq!(Term::from_variable("x").unit_value(), None);
  }

  #[test]
  fn test_pow() {
    let term = Term::from_variable("v").with_exponent(-1).pow(2);
    assert_eq!(term.exponent(), -2);
  }

  #[test]
  fn test_display() {
    assert_eq!(Term::from_variable("x").to_string(), "x");
    assert_eq!(Term::from_variable("x").with_exponent(-1).to_string(), "x^-1");
    assert_eq!(Term::from_unit(seconds()).with_exponent(2).to_string(), "s^2");
    assert_eq!(Term::from_unit(seconds()).descriptive_form(), "<b>1</b>⟨0,1,0⟩");
  }
}
