//! Core data types shared across the engine.

use serde::{Deserialize, Serialize};

/// Type alias for document identifiers.
///
/// Using a dedicated alias keeps the index maps readable and makes it easy to
/// change the representation later.
pub type DocId = String;

/// A document identifier paired with its accumulated relevance score.
pub type ScoredId = (DocId, f64);

/// The query strategies the engine offers.
///
/// Used to label diagnostics emitted by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
  /// Exact tag lookup.
  Tag,
  /// Tag lookup within an edit-distance tolerance.
  FuzzyTag,
  /// Ranked lookup over several tags.
  MultiTag,
  /// Ranked free-text lookup.
  Content,
  /// Ranked free-text lookup with `NOT` negation.
  Boolean,
  /// Prefix completion over tags and terms.
  AutoComplete,
}

/// Size counters of an index, as reported by `SearchEngine::stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
  /// Number of indexed documents.
  pub documents: usize,
  /// Number of distinct tags.
  pub tags: usize,
  /// Number of distinct content terms.
  pub terms: usize,
}
