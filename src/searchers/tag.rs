//! Exact and multi-tag lookup.

use crate::document::Document;
use crate::index::IndexStore;
use crate::searchers::tfidf::TfIdfScorer;
use crate::types::DocId;
use std::collections::HashMap;
use std::sync::Arc;

/// Finds every document carrying `tag`.
///
/// Tags are matched exactly (case-sensitive). Results keep the order in which
/// documents were tagged and are not ranked.
pub fn search_by_tag(store: &IndexStore, tag: &str) -> Vec<Arc<Document>> {
  if tag.is_empty() {
    return Vec::new();
  }

  store
    .tag_postings(tag)
    .map(|ids| ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    .unwrap_or_default()
}

/// Scores documents against several tags.
///
/// For every tag and every document carrying it, the document's TF-IDF score
/// for the tag text is added to its total. The tag text is scored against the
/// document content, so a document whose content never mentions the tag gets
/// nothing for it.
pub fn score_by_tags<S: AsRef<str>>(
  store: &IndexStore,
  scorer: &TfIdfScorer,
  tags: &[S],
) -> HashMap<DocId, f64> {
  let mut scores: HashMap<DocId, f64> = HashMap::new();

  for tag in tags {
    let tag = tag.as_ref();
    let Some(ids) = store.tag_postings(tag) else {
      continue;
    };
    for id in ids {
      if let Some(doc) = store.get(id) {
        *scores.entry(id.clone()).or_insert(0.0) += scorer.score(store, doc, tag);
      }
    }
  }

  scores
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> IndexStore {
    let mut store = IndexStore::new();
    let docs = [
      ("a", "red fox runs", vec!["animal", "fox"]),
      ("b", "red car drives", vec!["vehicle"]),
      ("c", "an animal nap", vec!["animal"]),
      ("d", "plain text", vec!["misc"]),
    ];
    for (id, content, tags) in docs {
      store.add(Document::new(id, content, tags).unwrap()).unwrap();
    }
    store
  }

  #[test]
  fn test_search_by_tag_in_insertion_order() {
    let store = store();
    let ids: Vec<_> = search_by_tag(&store, "animal")
      .iter()
      .map(|d| d.id().to_string())
      .collect();
    assert_eq!(ids, vec!["a", "c"]);
  }

  #[test]
  fn test_search_by_tag_is_exact() {
    let store = store();
    assert!(search_by_tag(&store, "Animal").is_empty());
    assert!(search_by_tag(&store, "anim").is_empty());
    assert!(search_by_tag(&store, "").is_empty());
  }

  #[test]
  fn test_score_by_tags_accumulates() {
    let store = store();
    let scorer = TfIdfScorer::new();
    let scores = score_by_tags(&store, &scorer, &["fox", "animal", "vehicle", "unknown"]);

    // "a" scores through "fox", "c" through "animal"
    assert!(scores["a"] > 0.0);
    assert!(scores["c"] > 0.0);
    let fox_only = score_by_tags(&store, &scorer, &["fox"]);
    assert_eq!(fox_only["a"], scores["a"]);
    // "vehicle" never appears in the content of "b"
    assert_eq!(scores["b"], 0.0);
    assert!(!scores.contains_key("d"));
  }
}
