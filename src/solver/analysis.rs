
//! Classification of a solution once elimination has stopped.

use super::solution::Solution;
use crate::error::SolverError;
use crate::units::Unit;
use crate::util::matrix::MatrixIndex;

use itertools::Itertools;
use num::Zero;
use serde::{Serialize, Deserialize};

use std::fmt::{self, Formatter, Display};

/// The verdict on a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
  /// Not yet analyzed.
  Unresolved,
  /// Every variable in scope is bound to exactly one unit and no
  /// constraint is contradicted.
  Consistent,
  /// Some constraint or variable is contradictory. The reason names
  /// each offender.
  Inconsistent { reason: String },
  /// Nothing is contradicted, but some variables are not pinned down.
  NonUnique,
}

/// The verdict on a single constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintState {
  Consistent,
  Inconsistent,
  NonUnique,
  Unknown,
}

/// The verdict on a single variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableState {
  Bound(Unit),
  /// No constraint in scope mentions the variable.
  Unbound,
  /// Several constraints still mention the variable, each with its
  /// own candidate unit.
  Ambiguous(Vec<Unit>),
  /// The one constraint mentioning the variable also mentions others.
  Underdetermined,
  /// Not examined by this solution.
  OutOfScope,
}

/// Which rows and variables a classification looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
  Whole,
  /// Only the rows a branch of the search touched, plus the forced
  /// rows binding variables those rows mention.
  Span,
  /// The rows no branch of the search examined, and the variables none
  /// of the examined rows mention.
  Residual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintVerdict {
  pub state: ConstraintState,
  pub explanation: String,
}

#[derive(Debug, Clone)]
pub(super) struct Analysis {
  scope: Option<AnalysisScope>,
  classification: Classification,
  constraints: Vec<ConstraintVerdict>,
  variables: Vec<VariableState>,
}

impl Classification {
  pub fn is_consistent(&self) -> bool {
    matches!(self, Classification::Consistent)
  }

  pub fn is_inconsistent(&self) -> bool {
    matches!(self, Classification::Inconsistent { .. })
  }

  pub fn is_non_unique(&self) -> bool {
    matches!(self, Classification::NonUnique)
  }

  pub fn reason(&self) -> Option<&str> {
    match self {
      Classification::Inconsistent { reason } => Some(reason),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Classification::Unresolved => "Unknown",
      Classification::Consistent => "Consistent",
      Classification::Inconsistent { .. } => "Inconsistent",
      Classification::NonUnique => "No Unique Solution",
    }
  }

  fn same_verdict(&self, other: &Classification) -> bool {
    std::mem::discriminant(self) == std::mem::discriminant(other)
  }
}

impl Display for Classification {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Classification::Inconsistent { reason } => write!(f, "Inconsistent: {}", reason),
      _ => write!(f, "{}", self.label()),
    }
  }
}

impl VariableState {
  pub fn verdict(&self) -> ConstraintState {
    match self {
      VariableState::Bound(_) => ConstraintState::Consistent,
      VariableState::Unbound | VariableState::Ambiguous(_) => ConstraintState::Inconsistent,
      VariableState::Underdetermined => ConstraintState::NonUnique,
      VariableState::OutOfScope => ConstraintState::Unknown,
    }
  }

  /// Text shown beside the variable when annotating a diagram.
  pub fn explanation(&self) -> String {
    match self {
      VariableState::Bound(unit) => unit.descriptive_form(),
      VariableState::Unbound => String::from("<Unbound>"),
      VariableState::Ambiguous(units) => {
        format!("*AMBIGUOUS* {}", units.iter().map(Unit::descriptive_form).join(";"))
      }
      VariableState::Underdetermined => String::from("<Underdetermined>"),
      VariableState::OutOfScope => String::new(),
    }
  }
}

impl ConstraintVerdict {
  fn new(state: ConstraintState, explanation: String) -> Self {
    Self { state, explanation }
  }

  fn unknown() -> Self {
    Self::new(ConstraintState::Unknown, String::new())
  }
}

impl Analysis {
  pub(super) fn pending(rows: usize, columns: usize) -> Self {
    Self {
      scope: None,
      classification: Classification::Unresolved,
      constraints: vec![ConstraintVerdict::unknown(); rows],
      variables: vec![VariableState::OutOfScope; columns],
    }
  }

  pub(super) fn same_verdict(&self, other: &Analysis) -> bool {
    self.classification.same_verdict(&other.classification)
  }
}

impl Solution {
  /// Classifies the current state over the given scope. Rows outside
  /// the scope are reported as [`ConstraintState::Unknown`] and
  /// variables outside it as [`VariableState::OutOfScope`].
  pub(super) fn analyze(&mut self, scope: AnalysisScope) -> Result<(), SolverError> {
    let rows = match scope {
      AnalysisScope::Whole => vec![true; self.row_count()],
      AnalysisScope::Span => self.span_scope(),
      AnalysisScope::Residual => self.in_span.clone(),
    };
    let columns = match scope {
      AnalysisScope::Whole => vec![true; self.variables().len()],
      AnalysisScope::Span => self.columns_mentioned_by(&rows),
      AnalysisScope::Residual => self.residual_columns(),
    };

    let constraints = (0..self.row_count())
      .map(|row| if rows[row] { self.constraint_verdict(row) } else { Ok(ConstraintVerdict::unknown()) })
      .collect::<Result<Vec<_>, _>>()?;
    let variables = (0..self.variables().len())
      .map(|column| if columns[column] { self.variable_verdict(column, &rows) } else { Ok(VariableState::OutOfScope) })
      .collect::<Result<Vec<_>, _>>()?;
    let classification = self.classify(&constraints, &variables);

    self.analysis = Analysis { scope: Some(scope), classification, constraints, variables };
    Ok(())
  }

  /// The span rows, together with the forced-sweep rows that bound a
  /// variable some span row originally mentioned.
  fn span_scope(&self) -> Vec<bool> {
    let mut rows = self.in_span.clone();
    for pivot in &self.sweep_pivots {
      if self.mentioned_initially(pivot.column, &self.in_span) {
        rows[pivot.row] = true;
      }
    }
    rows
  }

  fn columns_mentioned_by(&self, rows: &[bool]) -> Vec<bool> {
    (0..self.variables().len()).map(|column| self.mentioned_initially(column, rows)).collect()
  }

  /// The variables that no row outside the span originally mentions.
  /// For a residual state, whose span is the set of rows no other
  /// terminal examined, these are the variables nothing examined.
  pub(super) fn residual_columns(&self) -> Vec<bool> {
    let examined = self.in_span.iter().map(|&in_span| !in_span).collect::<Vec<_>>();
    self.columns_mentioned_by(&examined).into_iter().map(|mentioned| !mentioned).collect()
  }

  fn mentioned_initially(&self, column: usize, rows: &[bool]) -> bool {
    let initial = self.system.initial_exponents();
    rows.iter().enumerate().any(|(row, &included)| {
      included && !initial[MatrixIndex { row, column }].is_zero()
    })
  }

  fn constraint_verdict(&self, row: usize) -> Result<ConstraintVerdict, SolverError> {
    let unit = &self.units[row];
    let columns = self.exponents.nonzero_columns(row).collect::<Vec<_>>();
    let verdict = match columns.as_slice() {
      [] if unit.is_identity(self.config().tolerance) => {
        ConstraintVerdict::new(ConstraintState::Consistent, unit.descriptive_form())
      }
      [] => {
        ConstraintVerdict::new(ConstraintState::Inconsistent, unit.invert().descriptive_form())
      }
      [column] => {
        let bound = unit.root(self.exponents[MatrixIndex { row, column: *column }])?;
        ConstraintVerdict::new(ConstraintState::Consistent, bound.descriptive_form())
      }
      _ => {
        ConstraintVerdict::new(ConstraintState::NonUnique, unit.descriptive_form())
      }
    };
    Ok(verdict)
  }

  fn variable_verdict(&self, column: usize, rows: &[bool]) -> Result<VariableState, SolverError> {
    let mentions = self.exponents.nonzero_rows(column).filter(|&row| rows[row]).collect::<Vec<_>>();
    let candidate = |row: usize| self.units[row].root(self.exponents[MatrixIndex { row, column }]);
    let state = match mentions.as_slice() {
      [] => VariableState::Unbound,
      [row] if self.exponents.count_nonzero_in_row(*row) == 1 => VariableState::Bound(candidate(*row)?),
      [_] => VariableState::Underdetermined,
      _ => VariableState::Ambiguous(mentions.iter().map(|&row| candidate(row)).collect::<Result<_, _>>()?),
    };
    Ok(state)
  }

  fn classify(&self, constraints: &[ConstraintVerdict], variables: &[VariableState]) -> Classification {
    let mut reasons = Vec::new();
    for (row, verdict) in constraints.iter().enumerate() {
      if verdict.state == ConstraintState::Inconsistent {
        let source = self.source(row).map(ToString::to_string).unwrap_or_default();
        reasons.push(format!("{}: {}", source, verdict.explanation));
      }
    }
    for (name, state) in self.variables().iter().zip(variables) {
      match state {
        VariableState::Unbound => reasons.push(format!("{}: variable unbound", name)),
        VariableState::Ambiguous(_) => reasons.push(format!("{}: variable ambiguous {}", name, state.explanation())),
        _ => {}
      }
    }

    if !reasons.is_empty() {
      Classification::Inconsistent { reason: reasons.join("; ") }
    } else if constraints.iter().any(|v| v.state == ConstraintState::NonUnique) ||
              variables.iter().any(|v| *v == VariableState::Underdetermined) {
      Classification::NonUnique
    } else {
      Classification::Consistent
    }
  }

  pub fn classification(&self) -> &Classification {
    &self.analysis.classification
  }

  /// The scope of the last classification, or `None` if the solution
  /// has not been classified.
  pub fn analysis_scope(&self) -> Option<AnalysisScope> {
    self.analysis.scope
  }

  pub fn variable_state(&self, variable: &str) -> Option<&VariableState> {
    let column = self.system.variable_index(variable)?;
    self.analysis.variables.get(column)
  }

  /// The unit a variable is uniquely bound to, if any.
  pub fn binding_for(&self, variable: &str) -> Option<Unit> {
    match self.variable_state(variable)? {
      VariableState::Bound(unit) => Some(unit.clone()),
      _ => None,
    }
  }

  pub fn variable_explanation(&self, variable: &str) -> Option<String> {
    self.variable_state(variable).map(VariableState::explanation)
  }

  pub fn constraint_state(&self, row: usize) -> ConstraintState {
    self.analysis.constraints.get(row).map_or(ConstraintState::Unknown, |v| v.state)
  }

  pub fn is_constraint_consistent(&self, row: usize) -> bool {
    self.constraint_state(row) == ConstraintState::Consistent
  }

  /// The residual unit of a row in descriptive form. For a
  /// contradicted row this is the inverse of the residual, which is the
  /// factor the constraint is off by. Empty for rows not examined.
  pub fn explanation_for(&self, row: usize) -> String {
    self.analysis.constraints.get(row).map(|v| v.explanation.clone()).unwrap_or_default()
  }

  pub fn short_description(&self) -> String {
    self.classification().label().to_owned()
  }

  /// The classification label followed by the reasons for an
  /// inconsistency, if there are any.
  pub fn state_description(&self) -> String {
    self.classification().to_string()
  }

  pub(super) fn same_verdict(&self, other: &Solution) -> bool {
    self.analysis.same_verdict(&other.analysis)
  }
}
