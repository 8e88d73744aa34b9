
use super::unit::Unit;

use thiserror::Error;
use serde::{Serialize, Deserialize};
use num::{Rational64, Zero, One, Signed};

use std::fmt::{self, Formatter, Display};

/// The seven SI base dimensions. These seed the registry returned by
/// [`DimensionRegistry::si`], in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDimension {
  Length,
  Time,
  Mass,
  Temperature,
  Current,
  LuminousIntensity,
  AmountOfSubstance,
}

pub const NDIMS: usize = 7;

/// An ordered table of dimension categories. The position of a
/// category in the table is the index of its exponent in every
/// [`Unit`] built against this registry.
///
/// Registries are plain values. Nothing about them is global, so
/// independent solves (and tests) can each use their own category
/// space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRegistry {
  categories: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown dimension category '{name}'")]
pub struct UnknownDimensionError {
  pub name: String,
}

/// Helper for rendering a [`Unit`] with the category names of a
/// registry, such as `1000 length^2 / time`.
#[derive(Debug, Clone, Copy)]
pub struct UnitDisplay<'a> {
  registry: &'a DimensionRegistry,
  unit: &'a Unit,
}

impl BaseDimension {
  pub const ALL: [BaseDimension; NDIMS] = [
    BaseDimension::Length,
    BaseDimension::Time,
    BaseDimension::Mass,
    BaseDimension::Temperature,
    BaseDimension::Current,
    BaseDimension::LuminousIntensity,
    BaseDimension::AmountOfSubstance,
  ];

  pub fn name(self) -> &'static str {
    match self {
      BaseDimension::Length => "length",
      BaseDimension::Time => "time",
      BaseDimension::Mass => "mass",
      BaseDimension::Temperature => "temperature",
      BaseDimension::Current => "current",
      BaseDimension::LuminousIntensity => "intensity",
      BaseDimension::AmountOfSubstance => "amount",
    }
  }
}

impl UnknownDimensionError {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl DimensionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding the SI base dimensions.
  pub fn si() -> Self {
    Self::with_categories(BaseDimension::ALL.map(BaseDimension::name))
  }

  pub fn with_categories<I, S>(names: I) -> Self
  where I: IntoIterator<Item = S>,
        S: Into<String> {
    let mut registry = Self::new();
    for name in names {
      registry.register(name);
    }
    registry
  }

  /// Adds a category, returning its index. Registering a name which
  /// is already present returns the existing index.
  pub fn register(&mut self, name: impl Into<String>) -> usize {
    let name = name.into();
    if let Some(index) = self.index_of(&name) {
      return index;
    }
    self.categories.push(name);
    self.categories.len() - 1
  }

  pub fn index_of(&self, name: &str) -> Option<usize> {
    self.categories.iter().position(|c| c == name)
  }

  pub fn name(&self, index: usize) -> Option<&str> {
    self.categories.get(index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.categories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.categories.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
    self.categories.iter().map(String::as_str)
  }

  /// The dimensionless unit, with an explicit zero for every
  /// category.
  pub fn identity(&self) -> Unit {
    Unit::new(1.0, vec![Rational64::zero(); self.len()])
  }

  /// The unit of scale 1 in exactly one category.
  pub fn base_unit(&self, category: &str) -> Result<Unit, UnknownDimensionError> {
    self.unit(1.0, &[(category, 1)])
  }

  /// Builds a unit from a scale and a list of `(category, power)`
  /// pairs. Repeated categories accumulate.
  pub fn unit(&self, scale: f64, powers: &[(&str, i64)]) -> Result<Unit, UnknownDimensionError> {
    let mut exponents = vec![Rational64::zero(); self.len()];
    for &(category, power) in powers {
      let index = self.index_of(category).ok_or_else(|| UnknownDimensionError::new(category))?;
      exponents[index] += Rational64::from_integer(power);
    }
    Ok(Unit::new(scale, exponents))
  }

  pub fn display<'a>(&'a self, unit: &'a Unit) -> UnitDisplay<'a> {
    UnitDisplay { registry: self, unit }
  }
}

impl From<BaseDimension> for usize {
  fn from(base: BaseDimension) -> usize {
    match base {
      BaseDimension::Length => 0,
      BaseDimension::Time => 1,
      BaseDimension::Mass => 2,
      BaseDimension::Temperature => 3,
      BaseDimension::Current => 4,
      BaseDimension::LuminousIntensity => 5,
      BaseDimension::AmountOfSubstance => 6,
    }
  }
}

impl Display for BaseDimension {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl Display for UnitDisplay<'_> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut numerator: Vec<String> = Vec::new();
    let mut denominator: Vec<String> = Vec::new();
    for (index, power) in self.unit.exponents().iter().enumerate() {
      if power.is_zero() {
        continue;
      }
      let name = match self.registry.name(index) {
        Some(name) => name.to_owned(),
        None => format!("dim{}", index),
      };
      let magnitude = power.abs();
      let factor = if magnitude.is_one() {
        name
      } else {
        format!("{}^{}", name, magnitude)
      };
      if power.is_positive() {
        numerator.push(factor);
      } else {
        denominator.push(factor);
      }
    }
    let scale = self.unit.scale();
    if numerator.is_empty() {
      write!(f, "{}", scale)?;
    } else if scale == 1.0 {
      write!(f, "{}", numerator.join(" "))?;
    } else {
      write!(f, "{} {}", scale, numerator.join(" "))?;
    }
    if !denominator.is_empty() {
      write!(f, " / {}", denominator.join(" "))?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_si_registry_order() {
    let registry = DimensionRegistry::si();
    assert_eq!(registry.len(), NDIMS);
    for base in BaseDimension::ALL {
      assert_eq!(registry.index_of(base.name()), Some(usize::from(base)));
    }
  }

  #[test]
  fn test_register_is_idempotent() {
    let mut registry = DimensionRegistry::new();
    assert_eq!(registry.register("length"), 0);
    assert_eq!(registry.register("money"), 1);
    assert_eq!(registry.register("length"), 0);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.name(1), Some("money"));
    assert_eq!(registry.name(2), None);
  }

  #[test]
  fn test_base_unit() {
    let registry = DimensionRegistry::si();
    let second = registry.base_unit("time").unwrap();
    assert_eq!(second.scale(), 1.0);
    assert_eq!(second.exponents().len(), NDIMS);
    assert_eq!(second.exponent(1), Rational64::one());
    assert_eq!(second.exponent(0), Rational64::zero());
  }

  #[test]
  fn test_unknown_category() {
    let registry = DimensionRegistry::si();
    assert_eq!(registry.base_unit("flavor"), Err(UnknownDimensionError::new("flavor")));
  }

  #[test]
  fn test_unit_accumulates_repeated_categories() {
    let registry = DimensionRegistry::si();
    let unit = registry.unit(1000.0, &[("length", 1), ("length", 1), ("time", -1)]).unwrap();
    assert_eq!(unit.exponent(0), Rational64::from_integer(2));
    assert_eq!(unit.exponent(1), Rational64::from_integer(-1));
    assert_eq!(unit.scale(), 1000.0);
  }

  #[test]
  fn test_identity_is_dimensionless() {
    let registry = DimensionRegistry::si();
    assert!(registry.identity().is_dimensionless());
    assert_eq!(registry.identity(), Unit::IDENTITY);
  }

  #[test]
  fn test_display_composite() {
    let registry = DimensionRegistry::si();
    let unit = registry.unit(1.0, &[("time", 1), ("mass", 3), ("current", -1), ("amount", -2)]).unwrap();
    assert_eq!(registry.display(&unit).to_string(), "time mass^3 / current amount^2");
  }

  #[test]
  fn test_display_with_scale() {
    let registry = DimensionRegistry::si();
    let unit = registry.unit(1000.0, &[("length", 2), ("time", -1)]).unwrap();
    assert_eq!(registry.display(&unit).to_string(), "1000 length^2 / time");
  }

  #[test]
  fn test_display_dimensionless() {
    let registry = DimensionRegistry::si();
    assert_eq!(registry.display(&registry.identity()).to_string(), "1");
    let unit = registry.unit(1.0, &[("temperature", -1)]).unwrap();
    assert_eq!(registry.display(&unit).to_string(), "1 / temperature");
  }

  #[test]
  fn test_display_fractional_power() {
    let registry = DimensionRegistry::si();
    let unit = registry.base_unit("length").unwrap().pow(Rational64::new(1, 2));
    assert_eq!(registry.display(&unit).to_string(), "length^1/2");
  }
}
