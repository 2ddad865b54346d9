//! Tag lookup within an edit-distance tolerance.

use crate::context::QueryContext;
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::searchers::{fan_out, Partial};
use std::collections::HashSet;
use std::sync::Arc;

/// Levenshtein edit distance between two strings, counted in characters.
///
/// Classic dynamic programming over two rolling rows, so memory is
/// proportional to the length of `b`.
///
/// # Examples
///
/// ```
/// use tagdex::searchers::levenshtein;
///
/// assert_eq!(levenshtein("cat", "cta"), 2);
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  if a.is_empty() {
    return b.len();
  }
  if b.is_empty() {
    return a.len();
  }

  let mut prev: Vec<usize> = (0..=b.len()).collect();
  let mut curr = vec![0; b.len() + 1];

  for (i, ca) in a.iter().enumerate() {
    curr[0] = i + 1;
    for (j, cb) in b.iter().enumerate() {
      let cost = usize::from(ca != cb);
      curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[b.len()]
}

/// Finds documents carrying any tag within `tolerance` edits of `tag`.
///
/// The tag keys are snapshotted under the shared lock, which is released
/// before the distance computations are fanned out over the executor. Matching
/// keys are resolved under a fresh shared lock; keys or documents that were
/// removed in the meantime are skipped. The result is unranked and contains
/// each document at most once.
///
/// Fails with [`SearchError::InvalidArgument`] if `tolerance` is negative,
/// before touching the index.
pub fn fuzzy_search_by_tag(
  ctx: &QueryContext<'_>,
  tag: &str,
  tolerance: i32,
) -> Result<Partial<Vec<Arc<Document>>>> {
  let tolerance = usize::try_from(tolerance).map_err(|_| {
    SearchError::InvalidArgument(format!("tolerance cannot be negative: {tolerance}"))
  })?;
  if tag.is_empty() {
    return Ok(Partial::complete(Vec::new()));
  }

  let keys: Vec<String> = ctx.index.read().tag_keys().cloned().collect();

  let chunks = fan_out(ctx, &keys, |chunk| {
    Ok(
      chunk
        .iter()
        .filter(|key| levenshtein(tag, key) <= tolerance)
        .cloned()
        .collect::<Vec<String>>(),
    )
  })?;

  let mut matched = Vec::new();
  let mut failures = Vec::new();
  for chunk in chunks {
    match chunk {
      Ok(keys) => matched.extend(keys),
      Err(e) => failures.push(e),
    }
  }

  let store = ctx.index.read();
  let mut seen = HashSet::new();
  let mut documents = Vec::new();
  for key in &matched {
    let Some(ids) = store.tag_postings(key) else {
      continue;
    };
    for id in ids {
      if seen.insert(id.as_str()) {
        if let Some(doc) = store.get(id) {
          documents.push(Arc::clone(doc));
        }
      }
    }
  }

  Ok(Partial {
    value: documents,
    failures,
  })
}
