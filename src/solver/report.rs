
//! Human-readable dumps of solver state, and annotation records for
//! marking up a diagram with the outcome.

use super::analysis::ConstraintState;
use super::solution::Solution;
use crate::expr::SourceRef;

use serde::Serialize;

use std::borrow::Cow;
use std::fmt::{self, Formatter, Display};

/// A verdict on one diagram element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
  pub target: AnnotationTarget,
  pub state: ConstraintState,
  pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationTarget {
  Variable { name: String },
  Constraint { row: usize, source: SourceRef },
}

struct HeaderInfo<'a>(&'a Solution);

struct StateInfo<'a>(&'a Solution);

impl Annotation {
  /// The explanation, escaped for use as markup text. Explanations
  /// carry their own `<b>` tags, so this is only needed when the
  /// consumer does not expect markup.
  pub fn escaped_explanation(&self) -> Cow<'_, str> {
    html_escape::encode_safe(&self.explanation)
  }
}

impl Solution {
  /// The variables, and the constraints with their sources.
  pub fn header_info(&self) -> String {
    HeaderInfo(self).to_string()
  }

  /// The resolved flags, exponent matrix, and unit vector, one row per
  /// constraint, followed by the branch point and the classification.
  pub fn state_info(&self) -> String {
    StateInfo(self).to_string()
  }

  /// [`Solution::state_info`] for this state and each recorded
  /// ancestor, newest first.
  pub fn trace(&self) -> String {
    let mut states = vec![self.state_info()];
    let mut current = self.parent();
    while let Some(parent) = current {
      states.push(parent.state_info());
      current = parent.parent();
    }
    states.join("\n")
  }

  /// Verdicts on every variable and constraint this solution
  /// examined.
  pub fn annotations(&self) -> Vec<Annotation> {
    let variables = self.variables().iter().filter_map(|name| {
      let state = self.variable_state(name)?;
      Some(Annotation {
        target: AnnotationTarget::Variable { name: name.clone() },
        state: state.verdict(),
        explanation: state.explanation(),
      })
    });
    let constraints = self.sources().enumerate().map(|(row, source)| {
      Annotation {
        target: AnnotationTarget::Constraint { row, source: source.clone() },
        state: self.constraint_state(row),
        explanation: self.explanation_for(row),
      }
    });
    variables.chain(constraints)
      .filter(|annotation| annotation.state != ConstraintState::Unknown)
      .collect()
  }
}

impl Display for HeaderInfo<'_> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let solution = self.0;
    writeln!(f, "Header")?;
    writeln!(f, "Variables")?;
    for (column, name) in solution.variables().iter().enumerate() {
      writeln!(f, "  {:>3} {}", column, name)?;
    }
    writeln!(f)?;
    writeln!(f, "ConstrNum  Source")?;
    for row in 0..solution.row_count() {
      let source = solution.source(row).map(ToString::to_string).unwrap_or_default();
      let equation = solution.equation(row).map(|eq| eq.descriptive_form()).unwrap_or_default();
      writeln!(f, "{:>9}  {} {}", row, source, equation)?;
    }
    write!(f, "\\Header")
  }
}

impl Display for StateInfo<'_> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let solution = self.0;
    writeln!(f, "State")?;
    writeln!(f, "Depth {}", solution.depth())?;
    write!(f, "      ")?;
    for column in 0..solution.variables().len() {
      write!(f, " {:>5}", column)?;
    }
    writeln!(f)?;
    for (row, exponents) in solution.exponents().rows().enumerate() {
      let flag = if solution.is_resolved(row) { 'T' } else { 'F' };
      write!(f, "{} {:>3} ", flag, row)?;
      for exponent in exponents {
        write!(f, " {:>5}", exponent.to_string())?;
      }
      let unit = &solution.units()[row];
      writeln!(f, " {} {}", unit, unit.descriptive_form())?;
    }
    match solution.branch_point() {
      Some(pivot) => writeln!(f, "BranchPoint = {}", pivot)?,
      None => writeln!(f, "BranchPoint = none")?,
    }
    writeln!(f, "Solution: {}", solution.state_description())?;
    write!(f, "\\State")
  }
}
