//! Context provided to query processors during a query.

use crate::config::EngineConfig;
use crate::executor::TaskExecutor;
use crate::index::IndexStore;
use crate::searchers::tfidf::TfIdfScorer;
use parking_lot::RwLock;

/// Everything a query processor needs to run.
///
/// The context borrows the engine's shared index and executor. Processors that
/// fan out acquire the shared lock themselves, once per sub-task, and never
/// hold it while waiting for sub-tasks; a queued writer therefore cannot
/// deadlock a running query.
pub struct QueryContext<'a> {
  /// The shared index.
  pub index: &'a RwLock<IndexStore>,
  /// Where sub-tasks run.
  pub executor: &'a dyn TaskExecutor,
  /// Scoring function.
  pub scorer: TfIdfScorer,
  /// Execution options.
  pub config: &'a EngineConfig,
}

impl<'a> QueryContext<'a> {
  /// Creates a new `QueryContext`.
  pub fn new(
    index: &'a RwLock<IndexStore>,
    executor: &'a dyn TaskExecutor,
    config: &'a EngineConfig,
  ) -> Self {
    Self {
      index,
      executor,
      scorer: TfIdfScorer::new().with_click_weight(config.scoring.click_weight),
      config,
    }
  }

  /// Number of chunks a batch of work is split into.
  pub fn workers(&self) -> usize {
    if self.config.parallel {
      self.config.workers(self.executor.worker_count())
    } else {
      1
    }
  }
}
