use proptest::prelude::*;
use tagdex::index::IndexStore;
use tagdex::prelude::*;

#[derive(Debug, Clone)]
enum Op {
  Add(String, String, Vec<String>),
  Remove(String),
  Update(String, String, Vec<String>),
}

fn content() -> impl Strategy<Value = String> {
  prop::collection::vec("[a-eA-E!,.]{1,5}", 1..6).prop_map(|words| words.join(" "))
}

fn tags() -> impl Strategy<Value = Vec<String>> {
  prop::collection::vec("[a-e]{1,3}", 0..4)
}

fn id() -> impl Strategy<Value = String> {
  "[a-f]"
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    (id(), content(), tags()).prop_map(|(id, content, tags)| Op::Add(id, content, tags)),
    id().prop_map(Op::Remove),
    (id(), content(), tags()).prop_map(|(id, content, tags)| Op::Update(id, content, tags)),
  ]
}

/// Every key with its frequency, for comparing whole stores.
fn snapshot(store: &IndexStore) -> Vec<(String, usize)> {
  let mut keys: Vec<String> = store.tag_keys().chain(store.term_keys()).cloned().collect();
  keys.sort();
  keys.dedup();
  keys
    .into_iter()
    .map(|key| {
      let df = store.doc_frequency(&key).unwrap_or(0);
      (key, df)
    })
    .collect()
}

proptest! {
  #[test]
  fn test_maps_stay_consistent(ops in prop::collection::vec(op(), 1..40)) {
    let mut store = IndexStore::new();
    for op in ops {
      // conflicts and unknown ids are expected; they must leave the store intact
      let _ = match op {
        Op::Add(id, content, tags) => store.add(Document::new(id, content, tags).unwrap()),
        Op::Remove(id) => store.remove(&id).map(|_| ()),
        Op::Update(id, content, tags) => store.update(Document::new(id, content, tags).unwrap()),
      };
      prop_assert_eq!(store.total_docs(), store.len());
      prop_assert!(store.check_integrity().is_ok(), "{:?}", store.check_integrity());
    }
  }

  #[test]
  fn test_add_then_remove_restores_store(
    seed in prop::collection::vec((id(), content(), tags()), 0..8),
    fresh_content in content(),
    fresh_tags in tags(),
  ) {
    let mut store = IndexStore::new();
    for (id, content, tags) in seed {
      let _ = store.add(Document::new(id, content, tags).unwrap());
    }
    let before_stats = store.stats();
    let before = snapshot(&store);

    store.add(Document::new("fresh", fresh_content, fresh_tags).unwrap()).unwrap();
    store.remove("fresh").unwrap();

    prop_assert_eq!(store.stats(), before_stats);
    prop_assert_eq!(snapshot(&store), before);
  }
}
