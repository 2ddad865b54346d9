//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document such as
//! `{"parallel": false}` is a valid configuration.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling query execution and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Whether long-running queries may fan out onto the executor. When false
  /// every query runs on the calling thread.
  pub parallel: bool,
  /// Upper bound on the number of chunks a query is split into. A value of 0
  /// means "as many as the executor has workers".
  pub max_workers: usize,
  /// Content queries with at most this many terms are scored directly.
  pub content_fanout_threshold: usize,
  /// Scoring constants.
  pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      parallel: true,
      max_workers: 0,
      content_fanout_threshold: 2,
      scoring: ScoringConfig::default(),
    }
  }
}

/// Scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
  /// Weight of the click count in the popularity boost.
  pub click_weight: f64,
  /// Multiplier applied to the score of a negated boolean term.
  pub negation_weight: f64,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      click_weight: 0.1,
      negation_weight: 2.0,
    }
  }
}

impl EngineConfig {
  /// Parses a configuration from a JSON string.
  pub fn from_json_str(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Reads a configuration from a JSON file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| SearchError::io(path, e))?;
    Self::from_json_str(&raw)
  }

  /// Enables or disables fan-out.
  pub fn parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }

  /// Caps the number of chunks per query.
  pub fn max_workers(mut self, max_workers: usize) -> Self {
    self.max_workers = max_workers;
    self
  }

  /// Sets the number of terms up to which content queries are not fanned out.
  pub fn content_fanout_threshold(mut self, threshold: usize) -> Self {
    self.content_fanout_threshold = threshold;
    self
  }

  /// Sets the click weight used by the scorer.
  pub fn click_weight(mut self, weight: f64) -> Self {
    self.scoring.click_weight = weight;
    self
  }

  /// Sets the penalty multiplier for negated boolean terms.
  pub fn negation_weight(mut self, weight: f64) -> Self {
    self.scoring.negation_weight = weight;
    self
  }

  /// Number of chunks a query is split into on an executor with
  /// `executor_workers` workers.
  pub(crate) fn workers(&self, executor_workers: usize) -> usize {
    let workers = executor_workers.max(1);
    if self.max_workers > 0 {
      workers.min(self.max_workers)
    } else {
      workers
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = EngineConfig::default();
    assert!(config.parallel);
    assert_eq!(config.content_fanout_threshold, 2);
    assert_eq!(config.scoring.click_weight, 0.1);
    assert_eq!(config.scoring.negation_weight, 2.0);
  }

  #[test]
  fn test_partial_json_keeps_defaults() {
    let config =
      EngineConfig::from_json_str(r#"{"parallel": false, "scoring": {"click_weight": 0.5}}"#)
        .unwrap();
    assert!(!config.parallel);
    assert_eq!(config.scoring.click_weight, 0.5);
    assert_eq!(config.scoring.negation_weight, 2.0);
    assert_eq!(config.content_fanout_threshold, 2);
  }

  #[test]
  fn test_invalid_json() {
    let err = EngineConfig::from_json_str("{parallel: nope}").unwrap_err();
    assert!(matches!(err, SearchError::Config(_)));
  }

  #[test]
  fn test_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    std::fs::write(&path, r#"{"max_workers": 3}"#).unwrap();
    assert_eq!(EngineConfig::from_path(&path).unwrap().max_workers, 3);

    let missing = dir.path().join("missing.json");
    assert!(matches!(
      EngineConfig::from_path(missing),
      Err(SearchError::Io { .. })
    ));
  }

  #[test]
  fn test_workers() {
    let config = EngineConfig::default();
    assert_eq!(config.workers(8), 8);
    assert_eq!(config.workers(0), 1);
    assert_eq!(config.max_workers(2).workers(8), 2);
  }
}
