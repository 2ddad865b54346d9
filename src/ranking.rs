//! Turns accumulated document scores into a ranked list.

use crate::types::{DocId, ScoredId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Heap entry ordered by score only.
struct Scored {
  id: DocId,
  score: f64,
}

impl PartialEq for Scored {
  fn eq(&self, other: &Self) -> bool {
    self.score.total_cmp(&other.score) == Ordering::Equal
  }
}

impl Eq for Scored {}

impl PartialOrd for Scored {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Scored {
  fn cmp(&self, other: &Self) -> Ordering {
    self.score.total_cmp(&other.score)
  }
}

/// Ranks scored ids in descending score order.
///
/// Entries with a score of zero or below (and NaN) are discarded. The order of
/// equal scores is unspecified.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use tagdex::ranking::rank;
///
/// let scores = HashMap::from([
///   ("a".to_string(), 0.5),
///   ("b".to_string(), 2.0),
///   ("c".to_string(), -1.0),
/// ]);
/// let ranked: Vec<_> = rank(scores).into_iter().map(|(id, _)| id).collect();
/// assert_eq!(ranked, vec!["b", "a"]);
/// ```
pub fn rank(scores: HashMap<DocId, f64>) -> Vec<ScoredId> {
  let mut heap = BinaryHeap::with_capacity(scores.len());
  for (id, score) in scores {
    if score > 0.0 {
      heap.push(Scored { id, score });
    }
  }

  let mut ranked = Vec::with_capacity(heap.len());
  while let Some(Scored { id, score }) = heap.pop() {
    ranked.push((id, score));
  }
  ranked
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rank_orders_descending() {
    let scores: HashMap<DocId, f64> = (1..=50)
      .map(|i| (format!("doc{i}"), (i * 37 % 50) as f64 + 0.5))
      .collect();

    let ranked = rank(scores);
    assert_eq!(ranked.len(), 50);
    assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
  }

  #[test]
  fn test_rank_discards_non_positive() {
    let scores = HashMap::from([
      ("zero".to_string(), 0.0),
      ("neg".to_string(), -3.0),
      ("nan".to_string(), f64::NAN),
      ("pos".to_string(), 1e-9),
    ]);
    let ranked = rank(scores);
    assert_eq!(ranked, vec![("pos".to_string(), 1e-9)]);
  }

  #[test]
  fn test_rank_empty() {
    assert!(rank(HashMap::new()).is_empty());
  }
}
