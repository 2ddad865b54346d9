//! The query processors.
//!
//! Each processor reads the [`IndexStore`](crate::index::IndexStore) and
//! scores with [`TfIdfScorer`](crate::searchers::tfidf::TfIdfScorer). None of
//! them log: processors that fan out return a [`Partial`] carrying the errors
//! of failed sub-tasks, and the engine decides how to report them.
//!
//! # Available Processors
//!
//! - [`tag`]: exact tag lookup and ranked multi-tag lookup.
//! - [`fuzzy`]: tag lookup within a Levenshtein tolerance, fanned out over tag keys.
//! - [`content`]: ranked free-text lookup, fanned out over query terms.
//! - [`boolean`]: free-text lookup with one-shot `NOT` negation.
//! - [`autocomplete`]: prefix completion over tags and terms.

/// Prefix completion.
pub mod autocomplete;
/// Free-text lookup with negation.
pub mod boolean;
/// Ranked free-text lookup.
pub mod content;
/// Edit-distance tag lookup.
pub mod fuzzy;
/// Exact and multi-tag lookup.
pub mod tag;
/// Relevance scoring.
pub mod tfidf;
/// Text tokenization.
pub mod tokenizer;

use crate::context::QueryContext;
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::executor::Job;
use crate::index::IndexStore;
use crate::types::ScoredId;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub use fuzzy::levenshtein;
pub use tfidf::TfIdfScorer;
pub use tokenizer::tokenize;

/// The merged outcome of a fanned-out query.
#[derive(Debug)]
pub struct Partial<T> {
  /// Everything the successful sub-tasks produced.
  pub value: T,
  /// Errors of sub-tasks whose contribution is missing from `value`.
  pub failures: Vec<SearchError>,
}

impl<T> Partial<T> {
  /// A result with no failed sub-tasks.
  pub fn complete(value: T) -> Self {
    Self {
      value,
      failures: Vec::new(),
    }
  }
}

/// Splits `items` into chunks of `max(1, len / workers)` and runs `work` on
/// each chunk through the context's executor.
///
/// Returns one result per chunk, in chunk order. A chunk that panics yields
/// [`SearchError::Operation`] without disturbing its siblings. Fails as a
/// whole only if the executor cannot run the batch.
pub(crate) fn fan_out<T, R, F>(
  ctx: &QueryContext<'_>,
  items: &[T],
  work: F,
) -> Result<Vec<Result<R>>>
where
  T: Sync,
  R: Send,
  F: Fn(&[T]) -> Result<R> + Sync,
{
  if items.is_empty() {
    return Ok(Vec::new());
  }

  let chunk_size = (items.len() / ctx.workers()).max(1);
  let chunks: Vec<&[T]> = items.chunks(chunk_size).collect();
  let slots: Vec<Mutex<Option<Result<R>>>> = chunks.iter().map(|_| Mutex::new(None)).collect();

  let work = &work;
  let jobs: Vec<Job<'_>> = chunks
    .into_iter()
    .zip(&slots)
    .map(|(chunk, slot)| {
      Box::new(move || {
        let outcome = catch_unwind(AssertUnwindSafe(|| work(chunk)))
          .unwrap_or_else(|panic| Err(SearchError::Operation(panic_message(&*panic))));
        *slot.lock() = Some(outcome);
      }) as Job<'_>
    })
    .collect();

  ctx.executor.execute(jobs).map_err(|e| match e {
    SearchError::Operation(_) => e,
    other => SearchError::Operation(other.to_string()),
  })?;

  Ok(
    slots
      .into_iter()
      .map(|slot| {
        slot
          .into_inner()
          .unwrap_or_else(|| Err(SearchError::Operation("sub-task never ran".to_string())))
      })
      .collect(),
  )
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
  if let Some(message) = panic.downcast_ref::<&str>() {
    format!("sub-task panicked: {message}")
  } else if let Some(message) = panic.downcast_ref::<String>() {
    format!("sub-task panicked: {message}")
  } else {
    "sub-task panicked".to_string()
  }
}

/// Resolves ranked ids to documents, skipping ids that are no longer indexed.
pub fn resolve(store: &IndexStore, ranked: &[ScoredId]) -> Vec<Arc<Document>> {
  ranked
    .iter()
    .filter_map(|(id, _)| store.get(id).cloned())
    .collect()
}
