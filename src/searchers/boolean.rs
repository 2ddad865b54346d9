//! Free-text lookup with `NOT` negation.
//!
//! This is deliberately not a boolean algebra. The query is read left to
//! right, one whitespace-delimited word at a time:
//!
//! - `AND` and `OR` are skipped.
//! - `NOT` negates the next word that survives normalization.
//! - Any other word is normalized like indexed content and, if it is an
//!   indexed term, adds its score to every document containing it. A negated
//!   word subtracts `negation_weight` times its score instead.
//!
//! Operators are case-sensitive; `not` is an ordinary word.

use crate::index::IndexStore;
use crate::searchers::tfidf::TfIdfScorer;
use crate::searchers::tokenizer::normalize_term;
use crate::types::DocId;
use std::collections::HashMap;

const NOT: &str = "NOT";
const AND: &str = "AND";
const OR: &str = "OR";

/// Scores documents against a boolean-style query.
///
/// Returns unranked scores. Documents pushed to zero or below by negated
/// words are dropped later by [`rank`](crate::ranking::rank).
pub fn score_boolean(
  store: &IndexStore,
  scorer: &TfIdfScorer,
  negation_weight: f64,
  query: &str,
) -> HashMap<DocId, f64> {
  let mut scores: HashMap<DocId, f64> = HashMap::new();
  let mut negate = false;

  for word in query.split_whitespace() {
    match word {
      NOT => {
        negate = true;
        continue;
      }
      AND | OR => continue,
      _ => {}
    }

    let Some(term) = normalize_term(word) else {
      continue;
    };

    if let Some(ids) = store.term_postings(&term) {
      for id in ids {
        let Some(doc) = store.get(id) else {
          continue;
        };
        let score = scorer.score(store, doc, &term);
        let entry = scores.entry(id.clone()).or_insert(0.0);
        if negate {
          *entry -= score * negation_weight;
        } else {
          *entry += score;
        }
      }
    }
    negate = false;
  }

  scores
}
