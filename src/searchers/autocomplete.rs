//! Prefix completion over tags and content terms.

use crate::index::IndexStore;

/// Suggests tags and terms starting with `prefix`.
///
/// Matching is ASCII case-insensitive, but suggestions keep the spelling under
/// which they were indexed. Tags are collected before terms and a term equal
/// to an already collected tag is not repeated. Suggestions are ordered by
/// descending document frequency, then alphabetically, and cut to
/// `max_results` unless it is 0.
///
/// An empty prefix suggests nothing.
pub fn auto_complete(store: &IndexStore, prefix: &str, max_results: usize) -> Vec<String> {
  let prefix = prefix.to_ascii_lowercase();
  if prefix.is_empty() {
    return Vec::new();
  }

  let matches = |key: &&String| key.to_ascii_lowercase().starts_with(&prefix);

  let mut suggestions: Vec<String> = store.tag_keys().filter(matches).cloned().collect();
  for term in store.term_keys().filter(matches) {
    if !suggestions.contains(term) {
      suggestions.push(term.clone());
    }
  }

  suggestions.sort_by(|a, b| {
    let df_a = store.doc_frequency(a).unwrap_or(0);
    let df_b = store.doc_frequency(b).unwrap_or(0);
    df_b.cmp(&df_a).then_with(|| a.cmp(b))
  });

  if max_results > 0 {
    suggestions.truncate(max_results);
  }
  suggestions
}
