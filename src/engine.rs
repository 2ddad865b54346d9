//! The search engine facade.

use crate::config::EngineConfig;
use crate::context::QueryContext;
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::executor::{default_executor, TaskExecutor};
use crate::index::IndexStore;
use crate::persistence;
use crate::ranking::rank;
use crate::searchers::{self, autocomplete, boolean, content, fuzzy, tag, Partial};
use crate::types::{DocId, IndexStats, QueryKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// An embeddable document search engine.
///
/// `SearchEngine` owns one [`IndexStore`] behind a reader-writer lock and
/// answers every kind of query against it. Mutations take the lock
/// exclusively; queries share it, so any number of threads can search while
/// no writer is active. Long queries fan out onto the [`TaskExecutor`] given
/// to the builder.
///
/// The engine is `Send + Sync`; share it between threads with an `Arc`.
///
/// Create a `SearchEngine` with [`SearchEngine::new`] or the
/// [`SearchEngineBuilder`].
///
/// # Examples
///
/// ```rust
/// use tagdex::prelude::*;
///
/// let engine = SearchEngine::new();
/// engine.add_document(Document::new("a", "red fox", ["animal"]).unwrap()).unwrap();
/// engine.add_document(Document::new("b", "red car", ["vehicle"]).unwrap()).unwrap();
/// engine.add_document(Document::new("c", "blue sky", ["weather"]).unwrap()).unwrap();
///
/// let animals = engine.search_by_tag("animal");
/// assert_eq!(animals[0].id(), "a");
///
/// let reds = engine.search_by_content("red").unwrap();
/// assert_eq!(reds.len(), 2);
/// ```
pub struct SearchEngine {
  index: RwLock<IndexStore>,
  executor: Arc<dyn TaskExecutor>,
  config: EngineConfig,
}

impl Default for SearchEngine {
  fn default() -> Self {
    Self::new()
  }
}

impl SearchEngine {
  /// Creates an engine with the default configuration and executor.
  pub fn new() -> Self {
    Self::builder().build()
  }

  /// Creates a new `SearchEngineBuilder` to construct an engine.
  pub fn builder() -> SearchEngineBuilder {
    SearchEngineBuilder::new()
  }

  /// The configuration this engine was built with.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  fn context(&self) -> QueryContext<'_> {
    QueryContext::new(&self.index, self.executor.as_ref(), &self.config)
  }

  // ==========================================================================
  // Mutations
  // ==========================================================================

  /// Indexes a new document.
  ///
  /// Fails with [`SearchError::Conflict`] if a document with the same id is
  /// already indexed.
  pub fn add_document(&self, doc: Document) -> Result<()> {
    let id = doc.id().to_string();
    info!(target: "tagdex::index", id = %id, "Adding document");

    let result = self.index.write().add(doc);
    if let Err(e) = &result {
      error!(target: "tagdex::index", id = %id, error = %e, "Failed to add document");
    }
    result
  }

  /// Removes a document and every index entry pointing at it.
  pub fn remove_document(&self, id: &str) -> Result<()> {
    info!(target: "tagdex::index", id = %id, "Removing document");

    match self.index.write().remove(id) {
      Ok(_) => Ok(()),
      Err(e) => {
        error!(target: "tagdex::index", id = %id, error = %e, "Failed to remove document");
        Err(e)
      }
    }
  }

  /// Replaces an indexed document with a new version carrying the same id.
  ///
  /// The replacement happens under one exclusive lock, so concurrent queries
  /// see either the old or the new version, never neither.
  pub fn update_document(&self, doc: Document) -> Result<()> {
    let id = doc.id().to_string();
    info!(target: "tagdex::index", id = %id, "Updating document");

    let result = self.index.write().update(doc);
    if let Err(e) = &result {
      error!(target: "tagdex::index", id = %id, error = %e, "Failed to update document");
    }
    result
  }

  /// Removes every document.
  pub fn clear(&self) {
    info!(target: "tagdex::index", "Clearing index");
    self.index.write().clear();
  }

  /// Increments the click counter of an indexed document.
  ///
  /// Clicks raise the document's score in every ranked query.
  pub fn record_click(&self, id: &str) -> Result<()> {
    let store = self.index.read();
    let doc = store.get(id).ok_or_else(|| SearchError::not_found(id))?;
    doc.increment_click_count();
    debug!(target: "tagdex::index", id = %id, clicks = doc.click_count(), "Recorded click");
    Ok(())
  }

  // ==========================================================================
  // Queries
  // ==========================================================================

  /// Finds every document carrying `tag`, in the order they were tagged.
  pub fn search_by_tag(&self, tag: &str) -> Vec<Arc<Document>> {
    let kind = QueryKind::Tag;
    if tag.is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty tag");
      return Vec::new();
    }
    debug!(target: "tagdex::query", kind = ?kind, tag = %tag, "Running query");

    let documents = tag::search_by_tag(&self.index.read(), tag);
    debug!(target: "tagdex::query", kind = ?kind, results = documents.len(), "Query finished");
    documents
  }

  /// Finds documents carrying any tag within `tolerance` edits of `tag`.
  ///
  /// The result is not ranked and contains each document once. Fails with
  /// [`SearchError::InvalidArgument`] if `tolerance` is negative.
  pub fn fuzzy_search_by_tag(&self, tag: &str, tolerance: i32) -> Result<Vec<Arc<Document>>> {
    let kind = QueryKind::FuzzyTag;
    if tag.is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty tag");
    }
    debug!(target: "tagdex::query", kind = ?kind, tag = %tag, tolerance, "Running query");

    let partial = fuzzy::fuzzy_search_by_tag(&self.context(), tag, tolerance)
      .map_err(|e| Self::query_failed(kind, e))?;
    let documents = Self::settle(kind, partial);
    debug!(target: "tagdex::query", kind = ?kind, results = documents.len(), "Query finished");
    Ok(documents)
  }

  /// Ranks documents by how well they match several tags.
  ///
  /// A document scores for a tag only if it carries the tag and its content
  /// mentions the tag text.
  pub fn search_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Vec<Arc<Document>>> {
    let kind = QueryKind::MultiTag;
    if tags.is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty tag list");
      return Ok(Vec::new());
    }
    debug!(target: "tagdex::query", kind = ?kind, tags = tags.len(), "Running query");

    let scores = {
      let ctx = self.context();
      let store = self.index.read();
      tag::score_by_tags(&store, &ctx.scorer, tags)
    };
    Ok(self.finish(kind, scores))
  }

  /// Ranks documents by how well their content matches a free-text query.
  pub fn search_by_content(&self, query: &str) -> Result<Vec<Arc<Document>>> {
    let kind = QueryKind::Content;
    if query.trim().is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty query");
      return Ok(Vec::new());
    }
    debug!(target: "tagdex::query", kind = ?kind, query = %query, "Running query");

    let partial =
      content::score_by_content(&self.context(), query).map_err(|e| Self::query_failed(kind, e))?;
    let scores = Self::settle(kind, partial);
    Ok(self.finish(kind, scores))
  }

  /// Ranks documents against a query where `NOT` negates the next word.
  ///
  /// `AND` and `OR` are accepted and ignored; this is not a boolean algebra.
  pub fn boolean_search(&self, query: &str) -> Result<Vec<Arc<Document>>> {
    let kind = QueryKind::Boolean;
    if query.trim().is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty query");
      return Ok(Vec::new());
    }
    debug!(target: "tagdex::query", kind = ?kind, query = %query, "Running query");

    let scores = {
      let ctx = self.context();
      let store = self.index.read();
      boolean::score_boolean(&store, &ctx.scorer, self.config.scoring.negation_weight, query)
    };
    Ok(self.finish(kind, scores))
  }

  /// Suggests up to `max_results` tags and terms starting with `prefix`.
  /// A `max_results` of 0 means no limit.
  pub fn auto_complete(&self, prefix: &str, max_results: usize) -> Vec<String> {
    let kind = QueryKind::AutoComplete;
    if prefix.is_empty() {
      warn!(target: "tagdex::query", kind = ?kind, "Empty prefix");
      return Vec::new();
    }
    debug!(target: "tagdex::query", kind = ?kind, prefix = %prefix, max_results, "Running query");

    let suggestions = autocomplete::auto_complete(&self.index.read(), prefix, max_results);
    debug!(target: "tagdex::query", kind = ?kind, results = suggestions.len(), "Query finished");
    suggestions
  }

  /// Ranks `scores`, resolves them to documents and logs the outcome.
  fn finish(&self, kind: QueryKind, scores: HashMap<DocId, f64>) -> Vec<Arc<Document>> {
    let ranked = rank(scores);
    let documents = searchers::resolve(&self.index.read(), &ranked);
    if documents.len() < ranked.len() {
      warn!(
        target: "tagdex::query",
        kind = ?kind,
        missing = ranked.len() - documents.len(),
        "Ranked documents were removed before they could be returned"
      );
    }
    debug!(target: "tagdex::query", kind = ?kind, results = documents.len(), "Query finished");
    documents
  }

  /// Logs failed sub-tasks and keeps what the others produced.
  fn settle<T>(kind: QueryKind, partial: Partial<T>) -> T {
    for failure in &partial.failures {
      error!(target: "tagdex::query", kind = ?kind, error = %failure, "Query sub-task failed");
    }
    partial.value
  }

  fn query_failed(kind: QueryKind, e: SearchError) -> SearchError {
    match &e {
      SearchError::InvalidArgument(_) => {
        warn!(target: "tagdex::query", kind = ?kind, error = %e, "Rejected query")
      }
      _ => error!(target: "tagdex::query", kind = ?kind, error = %e, "Query failed"),
    }
    e
  }

  // ==========================================================================
  // Persistence
  // ==========================================================================

  /// Writes every indexed document to `path`, replacing the file.
  ///
  /// See [`persistence`] for the file format. Click counts are written but
  /// are not restored by [`load_index`](Self::load_index).
  pub fn save_index(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
      return Err(SearchError::InvalidArgument("index path cannot be empty".to_string()));
    }
    info!(target: "tagdex::persist", path = %path.display(), "Saving index");

    let store = self.index.read();
    let result = File::create(path).and_then(|file| {
      let mut writer = BufWriter::new(file);
      persistence::save(&store, &mut writer)?;
      writer.flush()
    });

    match result {
      Ok(()) => {
        info!(target: "tagdex::persist", path = %path.display(), documents = store.len(), "Index saved");
        Ok(())
      }
      Err(e) => {
        error!(target: "tagdex::persist", path = %path.display(), error = %e, "Failed to save index");
        Err(SearchError::io(path, e))
      }
    }
  }

  /// Replaces the indexed documents with those stored at `path`.
  ///
  /// The current documents are dropped first. If the file cannot be read or
  /// decoded the engine is left empty and [`SearchError::Io`] is returned.
  pub fn load_index(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
      return Err(SearchError::InvalidArgument("index path cannot be empty".to_string()));
    }
    info!(target: "tagdex::persist", path = %path.display(), "Loading index");

    let mut store = self.index.write();
    store.clear();

    let decoded = File::open(path).and_then(|file| persistence::load(&mut BufReader::new(file)));
    match decoded {
      Ok((loaded, report)) => {
        if !report.is_consistent() {
          warn!(
            target: "tagdex::persist",
            path = %path.display(),
            declared = report.declared,
            loaded = report.loaded,
            "Index header disagrees with the stored documents"
          );
        }
        *store = loaded;
        info!(target: "tagdex::persist", path = %path.display(), documents = report.loaded, "Index loaded");
        Ok(())
      }
      Err(e) => {
        error!(target: "tagdex::persist", path = %path.display(), error = %e, "Failed to load index");
        Err(SearchError::io(path, e))
      }
    }
  }

  // ==========================================================================
  // Inspection
  // ==========================================================================

  /// Number of indexed documents.
  pub fn document_count(&self) -> usize {
    self.index.read().total_docs()
  }

  /// Whether a document with `id` is indexed.
  pub fn has_document(&self, id: &str) -> bool {
    self.index.read().contains(id)
  }

  /// Ids of every indexed document, sorted.
  pub fn document_ids(&self) -> Vec<DocId> {
    self.index.read().document_ids()
  }

  /// Looks up an indexed document by id.
  pub fn find_document(&self, id: &str) -> Result<Arc<Document>> {
    self
      .index
      .read()
      .get(id)
      .cloned()
      .ok_or_else(|| SearchError::not_found(id))
  }

  /// Counts documents, distinct tags and distinct terms.
  pub fn stats(&self) -> IndexStats {
    self.index.read().stats()
  }

  /// Verifies that the index maps agree with each other.
  ///
  /// Fails with [`SearchError::Operation`] listing every inconsistency found.
  pub fn check_integrity(&self) -> Result<()> {
    self.index.read().check_integrity().map_err(|violations| {
      error!(target: "tagdex::index", violations = violations.len(), "Index integrity check failed");
      SearchError::Operation(format!("index is inconsistent: {}", violations.join("; ")))
    })
  }
}

/// A builder for creating `SearchEngine` instances.
///
/// # Examples
///
/// ```
/// use tagdex::prelude::*;
///
/// let engine = SearchEngine::builder()
///     .config(EngineConfig::default().max_workers(2).click_weight(0.2))
///     .executor(std::sync::Arc::new(Sequential))
///     .build();
/// assert_eq!(engine.config().max_workers, 2);
/// ```
#[derive(Default)]
pub struct SearchEngineBuilder {
  config: Option<EngineConfig>,
  executor: Option<Arc<dyn TaskExecutor>>,
}

impl SearchEngineBuilder {
  /// Creates a new, empty `SearchEngineBuilder`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the engine configuration.
  ///
  /// If not set, [`EngineConfig::default`] is used.
  pub fn config(mut self, config: EngineConfig) -> Self {
    self.config = Some(config);
    self
  }

  /// Sets the executor that fanned-out queries run on.
  ///
  /// If not set, rayon's global pool is used when the `parallel` feature is
  /// enabled and queries run inline otherwise.
  pub fn executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
    self.executor = Some(executor);
    self
  }

  /// Builds the `SearchEngine` with an empty index.
  pub fn build(self) -> SearchEngine {
    SearchEngine {
      index: RwLock::new(IndexStore::new()),
      executor: self.executor.unwrap_or_else(default_executor),
      config: self.config.unwrap_or_default(),
    }
  }
}
