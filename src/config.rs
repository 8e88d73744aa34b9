
//! Tunable solver settings.

use crate::units::DEFAULT_TOLERANCE;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Settings shared by a [`Solution`](crate::solver::Solution) and all
/// of its branches. Missing fields take their default values when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
  /// Relative scale tolerance used when deciding whether a residual
  /// unit is the identity.
  pub tolerance: f64,
  pub sweep: SweepMode,
  pub limits: SearchLimits,
  /// Collapse terminal branches that cover the same constraints and
  /// reach the same verdict.
  pub merge_duplicate_spans: bool,
  /// Keep a link from every branch to the state it was cloned from,
  /// for [`Solution::trace`](crate::solver::Solution::trace).
  pub record_trace: bool,
}

/// How the branching search eliminates forced pivots before it
/// starts branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
  /// Eliminate the rows that are pivotable in the initial system, once.
  /// Rows that only become pivotable as a result are left as branch
  /// points.
  #[default]
  SinglePass,
  /// Keep eliminating pivotable rows until none remain.
  Fixpoint,
}

/// Optional caps on the branching search. Exceeding one is reported
/// as [`SolverError::SearchTruncated`](crate::error::SolverError::SearchTruncated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
  pub max_depth: Option<usize>,
  pub max_solutions: Option<usize>,
}

#[derive(Debug, Error)]
#[error("Invalid solver configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl SolverConfig {
  pub fn from_json(text: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn to_json(&self) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn with_tolerance(mut self, tolerance: f64) -> Self {
    self.tolerance = tolerance;
    self
  }

  pub fn with_sweep(mut self, sweep: SweepMode) -> Self {
    self.sweep = sweep;
    self
  }

  pub fn with_limits(mut self, limits: SearchLimits) -> Self {
    self.limits = limits;
    self
  }

  pub fn with_merge_duplicate_spans(mut self, merge: bool) -> Self {
    self.merge_duplicate_spans = merge;
    self
  }

  pub fn with_trace(mut self, record_trace: bool) -> Self {
    self.record_trace = record_trace;
    self
  }
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      tolerance: DEFAULT_TOLERANCE,
      sweep: SweepMode::default(),
      limits: SearchLimits::default(),
      merge_duplicate_spans: true,
      record_trace: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.tolerance, 1e-8);
    assert_eq!(config.sweep, SweepMode::SinglePass);
    assert_eq!(config.limits, SearchLimits { max_depth: None, max_solutions: None });
    assert!(config.merge_duplicate_spans);
    assert!(!config.record_trace);
  }

  #[test]
  fn test_from_json_partial() {
    let config = SolverConfig::from_json(r#"{ "sweep": "fixpoint", "limits": { "max_depth": 4 } }"#).unwrap();
    assert_eq!(config.sweep, SweepMode::Fixpoint);
    assert_eq!(config.limits.max_depth, Some(4));
    assert_eq!(config.limits.max_solutions, None);
    assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
  }

  #[test]
  fn test_from_json_empty_object() {
    assert_eq!(SolverConfig::from_json("{}").unwrap(), SolverConfig::default());
  }

  #[test]
  fn test_from_json_invalid() {
    let err = SolverConfig::from_json(r#"{ "sweep": "sideways" }"#).unwrap_err();
    assert!(err.to_string().starts_with("Invalid solver configuration"));
  }

  #[test]
  fn test_json_roundtrip() {
    let config = SolverConfig::default().with_sweep(SweepMode::Fixpoint).with_trace(true);
    let text = config.to_json().unwrap();
    assert_eq!(SolverConfig::from_json(&text).unwrap(), config);
  }
}
