
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::expr::{Equation, SourceRef, TermKind};
use crate::units::Unit;
use crate::util::matrix::{Matrix, MatrixIndex};

use num::{Rational64, Zero};
use tracing::debug;

/// The immutable part of a constraint problem: the variables, the
/// equations as given and as canonicalized, and the initial exponent
/// matrix. Every branch of a search shares one of these.
#[derive(Debug)]
pub struct ConstraintSystem {
  variables: Vec<String>,
  equations: Vec<Equation>,
  canonical: Vec<Equation>,
  initial_exponents: Matrix<Rational64>,
  initial_units: Vec<Unit>,
  config: SolverConfig,
}

impl ConstraintSystem {
  /// Canonicalizes every equation and builds the exponent matrix. Row
  /// `i` corresponds to `equations[i]` and column `j` to
  /// `variables[j]`; a variable mentioned several times in one
  /// equation has its exponents summed.
  pub fn build(
    variables: Vec<String>,
    equations: Vec<Equation>,
    config: SolverConfig,
  ) -> Result<Self, SolverError> {
    let canonical = equations.iter()
      .map(Equation::canonicalize)
      .collect::<Result<Vec<_>, _>>()?;
    Self::assemble(variables, equations, canonical, config)
  }

  /// Builds the exponent matrix from equations that are already in
  /// canonical form, without rewriting them. An equation whose
  /// right-hand side is not a single unit, or whose left-hand side
  /// holds anything but variables, is rejected.
  pub fn from_canonical(
    variables: Vec<String>,
    equations: Vec<Equation>,
    config: SolverConfig,
  ) -> Result<Self, SolverError> {
    Self::assemble(variables, equations.clone(), equations, config)
  }

  fn assemble(
    variables: Vec<String>,
    equations: Vec<Equation>,
    canonical: Vec<Equation>,
    config: SolverConfig,
  ) -> Result<Self, SolverError> {
    let mut initial_exponents = Matrix::from_generator(canonical.len(), variables.len(), |_| Rational64::zero());
    let mut initial_units = Vec::with_capacity(canonical.len());
    for (row, equation) in canonical.iter().enumerate() {
      let unit = equation.rhs().single_unit().ok_or_else(|| {
        SolverError::NonUnitRightHandSide { origin: equation.source().clone() }
      })?;
      initial_units.push(unit);
      for term in equation.lhs().terms() {
        let TermKind::Variable(name) = term.kind() else {
          return Err(SolverError::NonVariableLeftHandSide { origin: equation.source().clone() });
        };
        let column = variables.iter().position(|v| v == name).ok_or_else(|| {
          SolverError::UnknownVariable { origin: equation.source().clone(), variable: name.clone() }
        })?;
        initial_exponents[MatrixIndex { row, column }] += Rational64::from_integer(term.exponent());
      }
    }
    debug!(variables = variables.len(), constraints = canonical.len(), "built constraint system");

    Ok(Self { variables, equations, canonical, initial_exponents, initial_units, config })
  }

  pub fn variables(&self) -> &[String] {
    &self.variables
  }

  pub fn variable_index(&self, name: &str) -> Option<usize> {
    self.variables.iter().position(|v| v == name)
  }

  pub fn variable_count(&self) -> usize {
    self.variables.len()
  }

  pub fn constraint_count(&self) -> usize {
    self.equations.len()
  }

  /// The equations as they were given.
  pub fn equations(&self) -> &[Equation] {
    &self.equations
  }

  pub fn canonical_equations(&self) -> &[Equation] {
    &self.canonical
  }

  pub fn source(&self, row: usize) -> Option<&SourceRef> {
    self.equations.get(row).map(Equation::source)
  }

  pub fn sources(&self) -> impl Iterator<Item = &SourceRef> + '_ {
    self.equations.iter().map(Equation::source)
  }

  pub fn initial_exponents(&self) -> &Matrix<Rational64> {
    &self.initial_exponents
  }

  pub fn initial_units(&self) -> &[Unit] {
    &self.initial_units
  }

  pub fn config(&self) -> &SolverConfig {
    &self.config
  }
}
