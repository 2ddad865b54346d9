//! TF-IDF relevance scoring with a popularity boost.
//!
//! This is a heuristic rather than textbook TF-IDF: term frequency is the
//! number of substring matches divided by the content length in bytes, and
//! the result is multiplied by a logarithmic click-count boost.

use crate::document::Document;
use crate::index::IndexStore;

/// A scorer for ranking documents against a single term.
///
/// The only tunable is `click_weight`, which controls how strongly the click
/// counter boosts a score. The default is 0.1.
#[derive(Debug, Clone, Copy)]
pub struct TfIdfScorer {
  /// Multiplier applied to the click count inside the boost logarithm.
  pub click_weight: f64,
}

impl Default for TfIdfScorer {
  fn default() -> Self {
    Self { click_weight: 0.1 }
  }
}

impl TfIdfScorer {
  /// Creates a new `TfIdfScorer` with the default click weight.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the click weight.
  pub fn with_click_weight(mut self, click_weight: f64) -> Self {
    self.click_weight = click_weight;
    self
  }

  /// Calculates the score of `doc` for `term`.
  ///
  /// # Arguments
  ///
  /// * `store` - Supplies the document frequency of `term` and the corpus size.
  /// * `doc` - The document being scored.
  /// * `term` - The query term. Compared case-insensitively (ASCII).
  ///
  /// # Returns
  ///
  /// `tf * idf * click_boost`, or 0.0 when the term is empty or absent.
  pub fn score(&self, store: &IndexStore, doc: &Document, term: &str) -> f64 {
    let content = doc.content().to_ascii_lowercase();
    let term = term.to_ascii_lowercase();
    if term.is_empty() {
      return 0.0;
    }

    let occurrences = content.matches(term.as_str()).count();
    if occurrences == 0 {
      return 0.0;
    }

    let tf = if content.is_empty() {
      0.0
    } else {
      occurrences as f64 / content.len() as f64
    };

    // Keys nobody references count as 1.
    let df = store.doc_frequency(&term).unwrap_or(1) as f64;
    let idf = Self::idf(df, store.total_docs());

    tf * idf * self.click_boost(doc.click_count())
  }

  /// `ln(total / df)`, or 0 when the ratio would be below 1 or undefined.
  fn idf(df: f64, total_docs: usize) -> f64 {
    let n = total_docs as f64;
    if total_docs > 0 && df > 0.0 && n >= df {
      (n / df).ln()
    } else {
      0.0
    }
  }

  /// `1 + ln(1 + clicks * click_weight)`.
  pub fn click_boost(&self, clicks: u32) -> f64 {
    1.0 + (clicks as f64 * self.click_weight).ln_1p()
  }
}
