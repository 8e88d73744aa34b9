
//! The branching search for minimal span solutions.

use super::analysis::{AnalysisScope, ConstraintState};
use super::solution::Solution;
use crate::config::{SearchLimits, SweepMode};
use crate::error::{SolverError, SearchLimit};
use crate::util::matrix::MatrixIndex;

use tracing::{debug, instrument, trace};

/// Depth-first exploration of the branch points of one root state.
/// Terminal states are collected in the order they are reached.
#[derive(Debug)]
struct SpanSearch {
  limits: SearchLimits,
  merge_duplicates: bool,
  explored: usize,
  results: Vec<Solution>,
}

impl Solution {
  /// Enumerates the minimal span solutions of the system.
  ///
  /// Rows that are pivotable from the outset are eliminated first (see
  /// [`SweepMode`]). If that already exposes a contradiction, or leaves
  /// nothing to choose between, the whole system is classified and
  /// returned as the only solution. Otherwise each remaining pivot is
  /// a branch point, and each is explored on its own copy of the
  /// state: eliminating the pivot, then following only the rows that
  /// elimination touched. Every state where a branch can go no further
  /// is classified over its span and returned.
  ///
  /// Rows and variables that no branch reaches, such as a cluster with
  /// no pivot or a variable no equation mentions, are classified
  /// together in one more solution with [`AnalysisScope::Residual`],
  /// returned last.
  #[instrument(skip_all)]
  pub fn minimal_span_solutions(self) -> Result<Vec<Solution>, SolverError> {
    let mut root = self;
    trace!(header = %root.header_info(), state = %root.state_info(), "initial state");
    root.sweep_forced_pivots()?;
    let contradicted = root.flag_contradictions();
    let branch_points = root.find_all_pivots();
    debug!(
      forced = root.sweep_pivots.len(),
      branch_points = branch_points.len(),
      contradicted,
      "swept forced pivots"
    );

    if contradicted || branch_points.is_empty() {
      root.analyze(AnalysisScope::Whole)?;
      debug!(classification = %root.short_description(), "root is terminal");
      return Ok(vec![root]);
    }

    let mut search = SpanSearch::new(root.config().limits, root.config().merge_duplicate_spans);
    for pivot in branch_points {
      search.explore(root.spawn_branch(), pivot)?;
    }
    if let Some(residual) = search.residual(root)? {
      search.emit(residual)?;
    }
    debug!(explored = search.explored, solutions = search.results.len(), "search finished");
    Ok(search.results)
  }

  fn sweep_forced_pivots(&mut self) -> Result<(), SolverError> {
    match self.config().sweep {
      SweepMode::SinglePass => {
        for pivot in self.find_all_pivots() {
          // An earlier elimination in this pass may have emptied the row.
          if self.find_pivot_in_row(pivot.row) == Some(pivot.column) {
            self.eliminate(pivot)?;
            self.sweep_pivots.push(pivot);
          }
        }
      }
      SweepMode::Fixpoint => {
        while let Some(pivot) = self.first_pivot() {
          self.eliminate(pivot)?;
          self.sweep_pivots.push(pivot);
        }
      }
    }
    Ok(())
  }

  /// Marks every unresolved row that has been reduced to a
  /// contradiction as resolved and part of the span. Returns whether
  /// there were any.
  fn flag_contradictions(&mut self) -> bool {
    let mut found = false;
    for row in 0..self.row_count() {
      if !self.resolved[row] && self.is_contradiction(row) {
        self.resolved[row] = true;
        self.in_span[row] = true;
        found = true;
      }
    }
    found
  }
}

impl SpanSearch {
  fn new(limits: SearchLimits, merge_duplicates: bool) -> Self {
    Self { limits, merge_duplicates, explored: 0, results: Vec::new() }
  }

  fn explore(&mut self, mut solution: Solution, pivot: MatrixIndex) -> Result<(), SolverError> {
    self.explored += 1;
    if let Some(max_depth) = self.limits.max_depth {
      if solution.depth() > max_depth {
        return Err(self.truncated(SearchLimit::MaxDepth(max_depth)));
      }
    }

    let affected = solution.branches_from(pivot);
    solution.eliminate(pivot)?;
    solution.in_span[pivot.row] = true;

    let mut contradicted = false;
    for &row in &affected {
      if solution.exponents.count_nonzero_in_row(row) == 0 {
        solution.in_span[row] = true;
        if solution.is_contradiction(row) {
          solution.resolved[row] = true;
          contradicted = true;
        }
      }
    }
    let next = affected.iter()
      .filter_map(|&row| solution.find_pivot_in_row(row).map(|column| MatrixIndex { row, column }))
      .collect::<Vec<_>>();
    debug!(depth = solution.depth(), %pivot, affected = affected.len(), next = next.len(), contradicted, "branch");

    if contradicted || next.is_empty() {
      solution.analyze(AnalysisScope::Span)?;
      trace!(state = %solution.state_info(), "terminal state");
      return self.emit(solution);
    }
    for pivot in next {
      self.explore(solution.spawn_branch(), pivot)?;
    }
    Ok(())
  }

  /// The root state restricted to what no terminal so far examined,
  /// classified, or `None` if every row and variable was examined.
  fn residual(&self, mut root: Solution) -> Result<Option<Solution>, SolverError> {
    root.in_span = (0..root.row_count())
      .map(|row| self.results.iter().all(|s| s.constraint_state(row) == ConstraintState::Unknown))
      .collect();
    if !root.in_span.contains(&true) && !root.residual_columns().contains(&true) {
      return Ok(None);
    }
    root.analyze(AnalysisScope::Residual)?;
    debug!(
      span = ?root.span_rows(),
      classification = %root.short_description(),
      "residual state"
    );
    Ok(Some(root))
  }

  fn emit(&mut self, solution: Solution) -> Result<(), SolverError> {
    if self.merge_duplicates && self.results.iter().any(|existing| is_duplicate(existing, &solution)) {
      debug!(span = ?solution.span_rows(), "merged duplicate span");
      return Ok(());
    }
    if let Some(max_solutions) = self.limits.max_solutions {
      if self.results.len() >= max_solutions {
        return Err(self.truncated(SearchLimit::MaxSolutions(max_solutions)));
      }
    }
    self.results.push(solution);
    Ok(())
  }

  fn truncated(&self, limit: SearchLimit) -> SolverError {
    SolverError::SearchTruncated { limit, explored: self.explored }
  }
}

fn is_duplicate(a: &Solution, b: &Solution) -> bool {
  a.in_span == b.in_span && a.same_verdict(b)
}
