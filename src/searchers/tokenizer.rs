//! Text tokenization utilities.
//!
//! The same normalization is applied when indexing content and when parsing
//! queries, so index keys and query keys always agree.

/// Tokenize text into normalized terms.
///
/// Splits on whitespace, strips every character that is not ASCII
/// alphanumeric, lowercases what remains and drops empty results.
pub fn tokenize(text: &str) -> Vec<String> {
  text.split_whitespace().filter_map(normalize_term).collect()
}

/// Normalize a single whitespace-delimited piece.
///
/// Returns `None` when nothing alphanumeric is left.
pub fn normalize_term(piece: &str) -> Option<String> {
  let term: String = piece
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_lowercase())
    .collect();
  (!term.is_empty()).then_some(term)
}
