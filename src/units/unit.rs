
use crate::util::{Recip, zip_padded};

use approx::{AbsDiffEq, RelativeEq};
use itertools::Itertools;
use num::{Rational64, Zero, One};
use num::pow::Pow;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use std::fmt::{self, Formatter, Display};
use std::ops::{Mul, Div};

/// Scale tolerance used when deciding whether two units are the
/// same. Scales come out of floating-point arithmetic, so exact
/// comparison is too strict for classification.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// A unit is a scale factor together with a vector of rational
/// exponents, one per dimension category of a
/// [`DimensionRegistry`](super::DimensionRegistry).
///
/// Exponent vectors of different lengths are compared as though the
/// shorter one were padded with zeroes, so a unit built before a
/// category was registered still compares equal to the same unit
/// built afterward.
///
/// All operations produce a new unit and leave their operands
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
  scale: f64,
  exponents: Vec<Rational64>,
  /// Human-readable names. These are carried along for display only
  /// and never take part in comparisons.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  labels: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Cannot take the root of {unit} with a zero exponent")]
pub struct DivisionByZeroExponentError {
  pub unit: Unit,
  _priv: (),
}

impl Unit {
  /// The dimensionless unit of scale 1.
  pub const IDENTITY: Unit = Unit { scale: 1.0, exponents: Vec::new(), labels: Vec::new() };

  pub fn new(scale: f64, exponents: Vec<Rational64>) -> Self {
    Self { scale, exponents, labels: Vec::new() }
  }

  pub fn from_integers(scale: f64, exponents: &[i64]) -> Self {
    Self::new(scale, exponents.iter().copied().map(Rational64::from_integer).collect())
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.labels.push(label.into());
    self
  }

  pub fn scale(&self) -> f64 {
    self.scale
  }

  pub fn exponents(&self) -> &[Rational64] {
    &self.exponents
  }

  /// The exponent of the given category, which is zero for any
  /// category beyond the end of this unit's vector.
  pub fn exponent(&self, index: usize) -> Rational64 {
    self.exponents.get(index).copied().unwrap_or_else(Rational64::zero)
  }

  pub fn labels(&self) -> &[String] {
    &self.labels
  }

  pub fn is_dimensionless(&self) -> bool {
    self.exponents.iter().all(Zero::is_zero)
  }

  pub fn multiply(&self, other: &Unit) -> Unit {
    Unit::new(
      self.scale * other.scale,
      zip_padded(&self.exponents, &other.exponents, Rational64::zero(), |a, b| a + b),
    )
  }

  pub fn divide(&self, other: &Unit) -> Unit {
    Unit::new(
      self.scale / other.scale,
      zip_padded(&self.exponents, &other.exponents, Rational64::zero(), |a, b| a - b),
    )
  }

  pub fn invert(&self) -> Unit {
    Unit::new(
      self.scale.recip(),
      self.exponents.iter().map(|e| -e).collect(),
    )
  }

  /// Raises the unit to a rational power. Raising to the power 1
  /// preserves the labels; any other power drops them.
  pub fn pow(&self, power: Rational64) -> Unit {
    if power.is_one() {
      return self.clone();
    }
    Unit::new(
      scale_pow(self.scale, power),
      self.exponents.iter().map(|e| e * power).collect(),
    )
  }

  pub fn powi(&self, power: i64) -> Unit {
    self.pow(Rational64::from_integer(power))
  }

  /// The unit `u` such that `u.pow(exponent) == self`. This is how a
  /// pivot is resolved, so a zero exponent is an error rather than an
  /// infinite scale.
  pub fn root(&self, exponent: Rational64) -> Result<Unit, DivisionByZeroExponentError> {
    if exponent.is_zero() {
      return Err(DivisionByZeroExponentError { unit: self.clone(), _priv: () });
    }
    Ok(self.pow(exponent.recip()))
  }

  /// Equal exponents, and scales equal up to the given relative (or,
  /// near zero, absolute) tolerance.
  pub fn approx_eq(&self, other: &Unit, tolerance: f64) -> bool {
    self.relative_eq(other, tolerance, tolerance)
  }

  pub fn is_identity(&self, tolerance: f64) -> bool {
    self.approx_eq(&Unit::IDENTITY, tolerance)
  }

  /// Label-free rendering of the unit, as `<b>scale</b>⟨e1,...,en⟩`.
  /// This is the form used in diagnostics.
  pub fn descriptive_form(&self) -> String {
    format!("<b>{}</b>⟨{}⟩", self.scale, self.exponents.iter().join(","))
  }

  fn exponents_eq(&self, other: &Unit) -> bool {
    zip_padded(&self.exponents, &other.exponents, Rational64::zero(), |a, b| a == b)
      .into_iter()
      .all(|x| x)
  }
}

fn scale_pow(scale: f64, power: Rational64) -> f64 {
  if power.is_integer() {
    if let Ok(n) = i32::try_from(power.to_integer()) {
      return scale.powi(n);
    }
  }
  scale.powf(*power.numer() as f64 / *power.denom() as f64)
}

impl PartialEq for Unit {
  fn eq(&self, other: &Unit) -> bool {
    self.scale == other.scale && self.exponents_eq(other)
  }
}

impl AbsDiffEq for Unit {
  type Epsilon = f64;

  fn default_epsilon() -> f64 {
    DEFAULT_TOLERANCE
  }

  fn abs_diff_eq(&self, other: &Unit, epsilon: f64) -> bool {
    self.exponents_eq(other) && self.scale.abs_diff_eq(&other.scale, epsilon)
  }
}

impl RelativeEq for Unit {
  fn default_max_relative() -> f64 {
    DEFAULT_TOLERANCE
  }

  fn relative_eq(&self, other: &Unit, epsilon: f64, max_relative: f64) -> bool {
    self.exponents_eq(other) && self.scale.relative_eq(&other.scale, epsilon, max_relative)
  }
}

impl Display for Unit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self.labels.first() {
      Some(label) => write!(f, "{}", label),
      None => write!(f, "{}", self.descriptive_form()),
    }
  }
}

impl Mul<&Unit> for &Unit {
  type Output = Unit;

  fn mul(self, rhs: &Unit) -> Unit {
    self.multiply(rhs)
  }
}

impl Mul for Unit {
  type Output = Unit;

  fn mul(self, rhs: Unit) -> Unit {
    self.multiply(&rhs)
  }
}

impl Div<&Unit> for &Unit {
  type Output = Unit;

  fn div(self, rhs: &Unit) -> Unit {
    self.divide(rhs)
  }
}

impl Div for Unit {
  type Output = Unit;

  fn div(self, rhs: Unit) -> Unit {
    self.divide(&rhs)
  }
}

impl Pow<Rational64> for &Unit {
  type Output = Unit;

  fn pow(self, rhs: Rational64) -> Unit {
    Unit::pow(self, rhs)
  }
}

impl Pow<i64> for &Unit {
  type Output = Unit;

  fn pow(self, rhs: i64) -> Unit {
    self.powi(rhs)
  }
}

impl Recip for &Unit {
  type Output = Unit;

  fn recip(self) -> Unit {
    self.invert()
  }
}

impl One for Unit {
  fn one() -> Self {
    Unit::IDENTITY
  }

  fn is_one(&self) -> bool {
    *self == Unit::IDENTITY
  }
}
