
use super::analysis::{Analysis, AnalysisScope};
use super::system::ConstraintSystem;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::expr::{Equation, SourceRef};
use crate::units::Unit;
use crate::util::into_singleton;
use crate::util::matrix::{Matrix, MatrixIndex};

use num::{Rational64, Zero, One};
use tracing::{debug, instrument, trace};

use std::rc::Rc;

/// One state of the elimination procedure over a
/// [`ConstraintSystem`].
///
/// Row `i` of the state stands for the relation
///
/// ```text
/// product over j of variables[j] ^ exponents[i][j] = units[i]
/// ```
///
/// which stays equivalent to the `i`th input equation as variables
/// are eliminated. Cloning a solution copies the matrix and unit
/// vector, so branches never observe each other's eliminations.
#[derive(Debug, Clone)]
pub struct Solution {
  pub(super) system: Rc<ConstraintSystem>,
  pub(super) exponents: Matrix<Rational64>,
  pub(super) units: Vec<Unit>,
  pub(super) resolved: Vec<bool>,
  /// Rows this branch of the search has eliminated or fully
  /// determined.
  pub(super) in_span: Vec<bool>,
  /// Pivots eliminated by the forced sweep that precedes branching.
  pub(super) sweep_pivots: Vec<MatrixIndex>,
  pub(super) branch_point: Option<MatrixIndex>,
  pub(super) depth: usize,
  pub(super) parent: Option<Rc<Solution>>,
  pub(super) analysis: Analysis,
}

impl Solution {
  /// Builds the initial state for the given variables and equations,
  /// with the default configuration.
  pub fn new<I, S>(variables: I, equations: impl IntoIterator<Item = Equation>) -> Result<Self, SolverError>
  where I: IntoIterator<Item = S>,
        S: Into<String> {
    Self::with_config(variables, equations, SolverConfig::default())
  }

  pub fn with_config<I, S>(
    variables: I,
    equations: impl IntoIterator<Item = Equation>,
    config: SolverConfig,
  ) -> Result<Self, SolverError>
  where I: IntoIterator<Item = S>,
        S: Into<String> {
    let system = ConstraintSystem::build(
      variables.into_iter().map(Into::into).collect(),
      equations.into_iter().collect(),
      config,
    )?;
    Ok(Self::from_system(system))
  }

  pub fn from_system(system: ConstraintSystem) -> Self {
    let rows = system.constraint_count();
    let columns = system.variable_count();
    Self {
      exponents: system.initial_exponents().clone(),
      units: system.initial_units().to_vec(),
      resolved: vec![false; rows],
      in_span: vec![false; rows],
      sweep_pivots: Vec::new(),
      branch_point: None,
      depth: 0,
      parent: None,
      analysis: Analysis::pending(rows, columns),
      system: Rc::new(system),
    }
  }

  pub fn system(&self) -> &ConstraintSystem {
    &self.system
  }

  pub fn config(&self) -> &SolverConfig {
    self.system.config()
  }

  pub fn variables(&self) -> &[String] {
    self.system.variables()
  }

  pub fn sources(&self) -> impl Iterator<Item = &SourceRef> + '_ {
    self.system.sources()
  }

  pub fn source(&self, row: usize) -> Option<&SourceRef> {
    self.system.source(row)
  }

  /// The `row`th equation as it was given.
  pub fn equation(&self, row: usize) -> Option<&Equation> {
    self.system.equations().get(row)
  }

  pub fn row_count(&self) -> usize {
    self.units.len()
  }

  pub fn exponents(&self) -> &Matrix<Rational64> {
    &self.exponents
  }

  pub fn units(&self) -> &[Unit] {
    &self.units
  }

  pub fn unit(&self, row: usize) -> Option<&Unit> {
    self.units.get(row)
  }

  pub fn is_resolved(&self, row: usize) -> bool {
    self.resolved.get(row).copied().unwrap_or(false)
  }

  pub fn is_in_span(&self, row: usize) -> bool {
    self.in_span.get(row).copied().unwrap_or(false)
  }

  /// The rows eliminated or fully determined by this branch of a
  /// search, in order.
  pub fn span_rows(&self) -> Vec<usize> {
    self.in_span.iter().enumerate().filter(|&(_, &in_span)| in_span).map(|(row, _)| row).collect()
  }

  /// The most recently eliminated pivot.
  pub fn branch_point(&self) -> Option<MatrixIndex> {
    self.branch_point
  }

  /// Number of branch points between the root state and this one.
  pub fn depth(&self) -> usize {
    self.depth
  }

  /// The state this one was branched from. Only recorded when
  /// [`SolverConfig::record_trace`] is set.
  pub fn parent(&self) -> Option<&Solution> {
    self.parent.as_deref()
  }

  /// The variable column that an unresolved row pins down on its own,
  /// which is the case when exactly one of its exponents is nonzero.
  pub fn find_pivot_in_row(&self, row: usize) -> Option<usize> {
    if row >= self.row_count() || self.resolved[row] {
      return None;
    }
    into_singleton(self.exponents.nonzero_columns(row))
  }

  /// Every pivot among the unresolved rows, in row order.
  pub fn find_all_pivots(&self) -> Vec<MatrixIndex> {
    (0..self.row_count())
      .filter_map(|row| self.find_pivot_in_row(row).map(|column| MatrixIndex { row, column }))
      .collect()
  }

  pub(super) fn first_pivot(&self) -> Option<MatrixIndex> {
    (0..self.row_count())
      .find_map(|row| self.find_pivot_in_row(row).map(|column| MatrixIndex { row, column }))
  }

  /// The unresolved rows, other than the pivot's own, that mention the
  /// pivot's variable and so change when it is eliminated. Empty for a
  /// column outside the system.
  pub fn branches_from(&self, pivot: MatrixIndex) -> Vec<usize> {
    self.exponents.nonzero_rows(pivot.column)
      .filter(|&row| row != pivot.row && !self.resolved[row])
      .collect()
  }

  /// Solves the pivot's row for the pivot's variable and divides the
  /// result out of every other unresolved row.
  pub fn eliminate(&mut self, pivot: MatrixIndex) -> Result<(), SolverError> {
    let exponent = self.exponents.get(pivot).copied().unwrap_or_else(Rational64::zero);
    if exponent.is_zero() {
      return Err(SolverError::ZeroPivotExponent { pivot });
    }
    let unit = self.units[pivot.row].root(exponent)?;
    debug!(
      %pivot,
      variable = %self.system.variables()[pivot.column],
      unit = %unit.descriptive_form(),
      "eliminating"
    );

    for row in 0..self.row_count() {
      if row == pivot.row || self.resolved[row] {
        continue;
      }
      let index = MatrixIndex { row, column: pivot.column };
      let power = self.exponents[index];
      if !power.is_zero() {
        self.units[row] = self.units[row].divide(&unit.pow(power));
        self.exponents[index] = Rational64::zero();
      }
    }

    self.units[pivot.row] = unit;
    self.exponents[pivot] = Rational64::one();
    self.resolved[pivot.row] = true;
    self.branch_point = Some(pivot);
    Ok(())
  }

  /// Eliminates pivots in row order until none remain, then
  /// classifies the whole system. Ties between pivots are broken by
  /// row order, so this finds one answer without branching.
  #[instrument(skip_all)]
  pub fn complete_solution(mut self) -> Result<Solution, SolverError> {
    trace!(state = %self.state_info(), "initial state");
    while let Some(pivot) = self.first_pivot() {
      self.eliminate(pivot)?;
    }
    self.analyze(AnalysisScope::Whole)?;
    trace!(state = %self.state_info(), "final state");
    debug!(classification = %self.short_description(), "complete solution");
    Ok(self)
  }

  /// An unresolved row with no variables left whose unit is not the
  /// identity.
  pub(super) fn is_contradiction(&self, row: usize) -> bool {
    self.exponents.count_nonzero_in_row(row) == 0 &&
      !self.units[row].is_identity(self.config().tolerance)
  }

  /// A copy of this state one level deeper in the search.
  pub(super) fn spawn_branch(&self) -> Solution {
    let mut child = self.clone();
    child.depth = self.depth + 1;
    child.parent = self.config().record_trace.then(|| Rc::new(self.clone()));
    child
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::{Expression, Term, build_equation};
  use crate::units::test_utils::{meters, seconds, kilometers};

  use approx::assert_relative_eq;

  fn eq(lhs: Vec<Term>, rhs: Unit, source: &str) -> Equation {
    build_equation(Expression::new(lhs), Expression::from_unit(rhs), SourceRef::wire(source))
  }

  fn var(name: &str, exponent: i64) -> Term {
    Term::from_variable(name).with_exponent(exponent)
  }

  #[test]
  fn test_new_builds_matrix() {
    let solution = Solution::new(["x", "y"], [
      eq(vec![var("x", 1)], meters(), "r1"),
      eq(vec![var("x", 1), var("y", -1)], Unit::IDENTITY, "r2"),
    ]).unwrap();
    assert_eq!(solution.row_count(), 2);
    assert_eq!(solution.exponents().row(1), Some(&[Rational64::one(), -Rational64::one()][..]));
    assert_eq!(solution.units(), &[meters(), Unit::IDENTITY]);
    assert!(!solution.is_resolved(0));
    assert_eq!(solution.branch_point(), None);
  }

  #[test]
  fn test_find_pivot_in_row() {
    let solution = Solution::new(["x", "y"], [
      eq(vec![var("x", 2)], meters(), "r1"),
      eq(vec![var("x", 1), var("y", 1)], meters(), "r2"),
      eq(vec![], meters(), "r3"),
    ]).unwrap();
    assert_eq!(solution.find_pivot_in_row(0), Some(0));
    assert_eq!(solution.find_pivot_in_row(1), None);
    assert_eq!(solution.find_pivot_in_row(2), None);
    assert_eq!(solution.find_pivot_in_row(3), None);
    assert_eq!(solution.find_all_pivots(), vec![MatrixIndex::new(0, 0)]);
  }

  #[test]
  fn test_eliminate_substitutes() {
    let mut solution = Solution::new(["x", "y"], [
      eq(vec![var("x", 2)], Unit::from_integers(1_000_000.0, &[2]), "r1"),
      eq(vec![var("x", 1), var("y", 1)], Unit::from_integers(1000.0, &[1, 1]), "r2"),
    ]).unwrap();
    assert_eq!(solution.branches_from(MatrixIndex::new(0, 0)), vec![1]);
    solution.eliminate(MatrixIndex::new(0, 0)).unwrap();

    assert!(solution.is_resolved(0));
    assert_eq!(solution.exponents()[MatrixIndex::new(0, 0)], Rational64::one());
    assert_relative_eq!(solution.units()[0], kilometers());
    assert_eq!(solution.exponents()[MatrixIndex::new(1, 0)], Rational64::zero());
    assert_relative_eq!(solution.units()[1], seconds());
    assert_eq!(solution.find_pivot_in_row(1), Some(1));
    assert_eq!(solution.branch_point(), Some(MatrixIndex::new(0, 0)));
  }

  #[test]
  fn test_eliminate_zero_pivot() {
    let mut solution = Solution::new(["x", "y"], [
      eq(vec![var("x", 1)], meters(), "r1"),
    ]).unwrap();
    let err = solution.eliminate(MatrixIndex::new(0, 1)).unwrap_err();
    assert_eq!(err, SolverError::ZeroPivotExponent { pivot: MatrixIndex::new(0, 1) });
  }

  #[test]
  fn test_out_of_range_pivot() {
    let mut solution = Solution::new(["x"], [eq(vec![var("x", 1)], meters(), "r1")]).unwrap();
    let pivot = MatrixIndex::new(0, 5);
    assert!(solution.branches_from(pivot).is_empty());
    assert_eq!(solution.eliminate(pivot).unwrap_err(), SolverError::ZeroPivotExponent { pivot });
    let pivot = MatrixIndex::new(4, 0);
    assert!(solution.branches_from(pivot).is_empty());
    assert_eq!(solution.eliminate(pivot).unwrap_err(), SolverError::ZeroPivotExponent { pivot });
  }

  #[test]
  fn test_eliminate_leaves_clone_untouched() {
    let original = Solution::new(["x"], [eq(vec![var("x", 1)], meters(), "r1")]).unwrap();
    let mut branch = original.spawn_branch();
    branch.eliminate(MatrixIndex::new(0, 0)).unwrap();
    assert!(!original.is_resolved(0));
    assert!(branch.is_resolved(0));
    assert_eq!(branch.depth(), 1);
    assert!(branch.parent().is_none());
  }

  #[test]
  fn test_spawn_branch_records_parent() {
    let config = SolverConfig::default().with_trace(true);
    let original = Solution::with_config(["x"], [eq(vec![var("x", 1)], meters(), "r1")], config).unwrap();
    let branch = original.spawn_branch();
    assert_eq!(branch.parent().map(Solution::depth), Some(0));
  }

  #[test]
  fn test_complete_solution_chains_pivots() {
    let solution = Solution::new(["x", "y", "z"], [
      eq(vec![var("x", 1), var("y", -1)], Unit::IDENTITY, "r1"),
      eq(vec![var("y", 1), var("z", 1)], Unit::from_integers(1.0, &[1, 1]), "r2"),
      eq(vec![var("z", 1)], seconds(), "r3"),
    ]).unwrap();
    let solution = solution.complete_solution().unwrap();
    assert!(solution.resolved.iter().all(|&r| r));
    assert_eq!(solution.binding_for("x"), Some(meters()));
    assert_eq!(solution.binding_for("y"), Some(meters()));
    assert_eq!(solution.binding_for("z"), Some(seconds()));
  }
}
