//! Ranked free-text lookup.

use crate::context::QueryContext;
use crate::error::Result;
use crate::index::IndexStore;
use crate::searchers::tfidf::TfIdfScorer;
use crate::searchers::tokenizer::tokenize;
use crate::searchers::{fan_out, Partial};
use crate::types::DocId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Scores documents against a free-text query.
///
/// The query is tokenized like indexed content. Short queries (at most
/// `content_fanout_threshold` terms) and queries on a context without
/// parallelism are scored directly under one shared lock. Longer queries are
/// split into term chunks; each chunk takes the shared lock on its own, builds
/// a local score map, releases the lock and then merges into the shared
/// accumulator under the accumulator's mutex.
///
/// Returns unranked scores; feed them to [`rank`](crate::ranking::rank).
pub fn score_by_content(ctx: &QueryContext<'_>, query: &str) -> Result<Partial<HashMap<DocId, f64>>> {
  let terms = tokenize(query);
  if terms.is_empty() {
    return Ok(Partial::complete(HashMap::new()));
  }

  if terms.len() <= ctx.config.content_fanout_threshold || ctx.workers() <= 1 {
    let store = ctx.index.read();
    return Ok(Partial::complete(score_terms(&store, &ctx.scorer, &terms)));
  }

  let scores: Mutex<HashMap<DocId, f64>> = Mutex::new(HashMap::new());
  let chunks = fan_out(ctx, &terms, |chunk| {
    let local = {
      let store = ctx.index.read();
      score_terms(&store, &ctx.scorer, chunk)
    };
    let mut shared = scores.lock();
    for (id, score) in local {
      *shared.entry(id).or_insert(0.0) += score;
    }
    Ok(())
  })?;

  let failures = chunks.into_iter().filter_map(|chunk| chunk.err()).collect();
  Ok(Partial {
    value: scores.into_inner(),
    failures,
  })
}

/// Sums the score of every document containing any of `terms`.
pub fn score_terms(store: &IndexStore, scorer: &TfIdfScorer, terms: &[String]) -> HashMap<DocId, f64> {
  let mut scores: HashMap<DocId, f64> = HashMap::new();
  for term in terms {
    let Some(ids) = store.term_postings(term) else {
      continue;
    };
    for id in ids {
      if let Some(doc) = store.get(id) {
        *scores.entry(id.clone()).or_insert(0.0) += scorer.score(store, doc, term);
      }
    }
  }
  scores
}
