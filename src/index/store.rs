//! The in-memory inverted index.

use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::searchers::tokenizer::tokenize;
use crate::types::{DocId, IndexStats};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// In-memory index made of four mutually consistent maps.
///
/// - `documents` owns every document and is the single source of truth.
/// - `tag_index` maps a tag to the ids carrying it, in insertion order.
/// - `content_index` maps a content term to the ids whose content contains it.
/// - `doc_frequency` counts, per tag or term, how often it was indexed. Tags
///   and terms share one counter space.
///
/// Content terms are counted once per occurrence, so a document containing
/// "red red" contributes 2 to `doc_frequency["red"]`. Removal decrements
/// symmetrically, so counters always return to their previous value.
///
/// The store does no locking and no logging; the engine wraps it in a
/// reader-writer lock.
#[derive(Debug, Default)]
pub struct IndexStore {
  documents: HashMap<DocId, Arc<Document>>,
  tag_index: HashMap<String, Vec<DocId>>,
  content_index: HashMap<String, HashSet<DocId>>,
  doc_frequency: HashMap<String, usize>,
  total_docs: usize,
}

impl IndexStore {
  /// Create a new empty index.
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a document into every map.
  ///
  /// Fails with [`SearchError::Conflict`] if the id is already indexed, or
  /// [`SearchError::Validation`] if the document is invalid. On failure the
  /// store is unchanged.
  pub fn add(&mut self, doc: Document) -> Result<()> {
    doc.validate()?;
    if self.documents.contains_key(doc.id()) {
      return Err(SearchError::Conflict {
        id: doc.id().to_string(),
      });
    }

    let id: DocId = doc.id().to_string();
    for tag in doc.tags() {
      self.tag_index.entry(tag.clone()).or_default().push(id.clone());
      *self.doc_frequency.entry(tag.clone()).or_insert(0) += 1;
    }
    for term in tokenize(doc.content()) {
      self.content_index.entry(term.clone()).or_default().insert(id.clone());
      *self.doc_frequency.entry(term).or_insert(0) += 1;
    }

    self.documents.insert(id, Arc::new(doc));
    self.total_docs += 1;
    Ok(())
  }

  /// Removes a document from every map and returns it.
  pub fn remove(&mut self, id: &str) -> Result<Arc<Document>> {
    let doc = self
      .documents
      .remove(id)
      .ok_or_else(|| SearchError::not_found(id))?;

    for tag in doc.tags() {
      if let Some(ids) = self.tag_index.get_mut(tag) {
        ids.retain(|d| d != id);
        if ids.is_empty() {
          self.tag_index.remove(tag);
        }
      }
      self.decrement_frequency(tag);
    }
    for term in tokenize(doc.content()) {
      if let Some(ids) = self.content_index.get_mut(&term) {
        ids.remove(id);
        if ids.is_empty() {
          self.content_index.remove(&term);
        }
      }
      self.decrement_frequency(&term);
    }

    self.total_docs -= 1;
    Ok(doc)
  }

  /// Replaces an indexed document with a new version carrying the same id.
  ///
  /// The caller holds exclusive access for the whole call, so readers never
  /// observe the gap between removal and re-insertion.
  pub fn update(&mut self, doc: Document) -> Result<()> {
    doc.validate()?;
    if !self.documents.contains_key(doc.id()) {
      return Err(SearchError::not_found(doc.id()));
    }
    self.remove(doc.id())?;
    self.add(doc)
  }

  /// Drops every document and index entry.
  pub fn clear(&mut self) {
    self.documents.clear();
    self.tag_index.clear();
    self.content_index.clear();
    self.doc_frequency.clear();
    self.total_docs = 0;
  }

  fn decrement_frequency(&mut self, key: &str) {
    if let Some(count) = self.doc_frequency.get_mut(key) {
      *count = count.saturating_sub(1);
      if *count == 0 {
        self.doc_frequency.remove(key);
      }
    }
  }

  // ==========================================================================
  // Read access
  // ==========================================================================

  pub fn contains(&self, id: &str) -> bool {
    self.documents.contains_key(id)
  }

  pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
    self.documents.get(id)
  }

  /// All document ids, sorted.
  pub fn document_ids(&self) -> Vec<DocId> {
    let mut ids: Vec<DocId> = self.documents.keys().cloned().collect();
    ids.sort();
    ids
  }

  /// Ids carrying `tag`, in the order they were added.
  pub fn tag_postings(&self, tag: &str) -> Option<&[DocId]> {
    self.tag_index.get(tag).map(Vec::as_slice)
  }

  /// Ids whose content contains `term`.
  pub fn term_postings(&self, term: &str) -> Option<&HashSet<DocId>> {
    self.content_index.get(term)
  }

  pub fn tag_keys(&self) -> impl Iterator<Item = &String> {
    self.tag_index.keys()
  }

  pub fn term_keys(&self) -> impl Iterator<Item = &String> {
    self.content_index.keys()
  }

  /// Indexing count for a tag or term, `None` when nothing references it.
  pub fn doc_frequency(&self, key: &str) -> Option<usize> {
    self.doc_frequency.get(key).copied()
  }

  pub fn total_docs(&self) -> usize {
    self.total_docs
  }

  pub fn len(&self) -> usize {
    self.documents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.documents.is_empty()
  }

  pub fn stats(&self) -> IndexStats {
    IndexStats {
      documents: self.documents.len(),
      tags: self.tag_index.len(),
      terms: self.content_index.len(),
    }
  }

  /// Verifies that the four maps agree with each other.
  ///
  /// Returns every violation found, or `Ok(())` for a consistent index.
  pub fn check_integrity(&self) -> std::result::Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if self.total_docs != self.documents.len() {
      problems.push(format!(
        "total_docs is {} but {} documents are stored",
        self.total_docs,
        self.documents.len()
      ));
    }

    for (tag, ids) in &self.tag_index {
      if ids.is_empty() {
        problems.push(format!("tag '{tag}' has an empty posting list"));
      }
      for id in ids {
        match self.documents.get(id) {
          Some(doc) if doc.has_tag(tag) => {}
          Some(_) => problems.push(format!("'{id}' listed under tag '{tag}' it does not carry")),
          None => problems.push(format!("tag '{tag}' references unknown id '{id}'")),
        }
      }
    }

    for (term, ids) in &self.content_index {
      if ids.is_empty() {
        problems.push(format!("term '{term}' has an empty posting set"));
      }
      for id in ids {
        match self.documents.get(id) {
          Some(doc) if tokenize(doc.content()).iter().any(|t| t == term) => {}
          Some(_) => problems.push(format!("'{id}' listed under term '{term}' it does not contain")),
          None => problems.push(format!("term '{term}' references unknown id '{id}'")),
        }
      }
    }

    let mut expected: HashMap<String, usize> = HashMap::new();
    for (id, doc) in &self.documents {
      for tag in doc.tags() {
        *expected.entry(tag.clone()).or_insert(0) += 1;
        if !self.tag_index.get(tag).is_some_and(|ids| ids.contains(id)) {
          problems.push(format!("'{id}' missing from tag index under '{tag}'"));
        }
      }
      for term in tokenize(doc.content()) {
        if !self.content_index.get(&term).is_some_and(|ids| ids.contains(id)) {
          problems.push(format!("'{id}' missing from content index under '{term}'"));
        }
        *expected.entry(term).or_insert(0) += 1;
      }
    }
    if expected != self.doc_frequency {
      problems.push("document frequencies disagree with indexed documents".to_string());
    }

    if problems.is_empty() {
      Ok(())
    } else {
      Err(problems)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doc(id: &str, content: &str, tags: &[&str]) -> Document {
    Document::new(id, content, tags.iter().copied()).unwrap()
  }

  #[test]
  fn test_add_populates_every_map() {
    let mut store = IndexStore::new();
    store.add(doc("a", "Red fox", &["animal"])).unwrap();

    assert_eq!(store.total_docs(), 1);
    assert_eq!(store.tag_postings("animal"), Some(&["a".to_string()][..]));
    assert!(store.term_postings("red").unwrap().contains("a"));
    assert!(store.term_postings("fox").unwrap().contains("a"));
    assert_eq!(store.doc_frequency("animal"), Some(1));
    assert_eq!(store.doc_frequency("red"), Some(1));
    assert!(store.check_integrity().is_ok());
  }

  #[test]
  fn test_add_duplicate_conflicts() {
    let mut store = IndexStore::new();
    store.add(doc("a", "one", &[])).unwrap();
    let err = store.add(doc("a", "two", &[])).unwrap_err();
    assert!(matches!(err, SearchError::Conflict { id } if id == "a"));
    assert_eq!(store.get("a").unwrap().content(), "one");
    assert_eq!(store.doc_frequency("two"), None);
  }

  #[test]
  fn test_frequency_counts_every_occurrence() {
    let mut store = IndexStore::new();
    store.add(doc("a", "red red red", &[])).unwrap();
    store.add(doc("b", "red", &["red"])).unwrap();

    // three occurrences in "a", one term and one tag in "b"
    assert_eq!(store.doc_frequency("red"), Some(5));
    assert_eq!(store.term_postings("red").unwrap().len(), 2);

    store.remove("a").unwrap();
    assert_eq!(store.doc_frequency("red"), Some(2));
    assert!(store.check_integrity().is_ok());
  }

  #[test]
  fn test_remove_restores_previous_state() {
    let mut store = IndexStore::new();
    store.add(doc("a", "red fox", &["animal"])).unwrap();
    let before = store.stats();

    store.add(doc("b", "red car", &["vehicle", "animal"])).unwrap();
    store.remove("b").unwrap();

    assert_eq!(store.stats(), before);
    assert_eq!(store.doc_frequency("red"), Some(1));
    assert_eq!(store.doc_frequency("car"), None);
    assert_eq!(store.tag_postings("vehicle"), None);
    assert_eq!(store.tag_postings("animal").unwrap().len(), 1);
    assert!(store.check_integrity().is_ok());
  }

  #[test]
  fn test_remove_unknown_is_not_found() {
    let mut store = IndexStore::new();
    assert!(matches!(store.remove("nope"), Err(SearchError::NotFound { .. })));
  }

  #[test]
  fn test_update_replaces_content_and_tags() {
    let mut store = IndexStore::new();
    store.add(doc("a", "red fox", &["animal"])).unwrap();
    store.update(doc("a", "blue whale", &["ocean"])).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.term_postings("red"), None);
    assert!(store.term_postings("whale").unwrap().contains("a"));
    assert_eq!(store.tag_postings("animal"), None);
    assert!(store.check_integrity().is_ok());

    let err = store.update(doc("zzz", "x", &[])).unwrap_err();
    assert!(matches!(err, SearchError::NotFound { .. }));
  }

  #[test]
  fn test_clear() {
    let mut store = IndexStore::new();
    store.add(doc("a", "red fox", &["animal"])).unwrap();
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.stats(), IndexStats::default());
    assert_eq!(store.doc_frequency("red"), None);
  }

  #[test]
  fn test_document_ids_sorted() {
    let mut store = IndexStore::new();
    for id in ["c", "a", "b"] {
      store.add(doc(id, "x", &[])).unwrap();
    }
    assert_eq!(store.document_ids(), vec!["a", "b", "c"]);
  }
}
