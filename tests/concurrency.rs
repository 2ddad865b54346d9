use std::sync::Arc;
use std::thread;
use tagdex::prelude::*;

const WORDS: [&str; 10] = [
  "amber", "basalt", "cedar", "dune", "ember", "fjord", "glacier", "harbor", "island", "jungle",
];

fn content(seed: usize) -> String {
  (0..4)
    .map(|i| WORDS[(seed * 7 + i * 3) % WORDS.len()])
    .collect::<Vec<_>>()
    .join(" ")
}

fn engine(executor: Arc<dyn TaskExecutor>) -> Arc<SearchEngine> {
  let engine = SearchEngine::builder()
    .config(EngineConfig::default().content_fanout_threshold(1))
    .executor(executor)
    .build();
  for i in 0..100 {
    let tag = WORDS[i % WORDS.len()];
    engine
      .add_document(Document::new(format!("base-{i}"), content(i), [tag]).unwrap())
      .unwrap();
  }
  Arc::new(engine)
}

fn hammer(engine: Arc<SearchEngine>) {
  let mut handles = Vec::new();

  for w in 0..3 {
    let engine = Arc::clone(&engine);
    handles.push(thread::spawn(move || {
      for i in 0..50 {
        let id = format!("w{w}-{i}");
        engine
          .add_document(Document::new(id.clone(), content(i + w), ["temp"]).unwrap())
          .unwrap();
        if i % 2 == 0 {
          engine.remove_document(&id).unwrap();
        } else {
          engine
            .update_document(Document::new(id, content(i), ["temp", "kept"]).unwrap())
            .unwrap();
        }
      }
    }));
  }

  for r in 0..4 {
    let engine = Arc::clone(&engine);
    handles.push(thread::spawn(move || {
      for i in 0..50 {
        let query = format!("{} {} {}", WORDS[(r + i) % 10], WORDS[(r + i + 3) % 10], WORDS[(r + i + 6) % 10]);
        let results = engine.search_by_content(&query).unwrap();
        // every returned document was indexed when resolved
        assert!(results.iter().all(|d| !d.content().is_empty()));
        engine.fuzzy_search_by_tag("tmep", 2).unwrap();
        engine.boolean_search(&format!("{} NOT {}", WORDS[i % 10], WORDS[r])).unwrap();
        engine.auto_complete("g", 5);
        let _ = engine.record_click(&format!("base-{}", i % 100));
      }
    }));
  }

  for handle in handles {
    handle.join().unwrap();
  }

  // 100 base documents plus 25 kept per writer
  assert_eq!(engine.document_count(), 175);
  assert_eq!(engine.search_by_tag("kept").len(), 75);
  assert!(engine.search_by_tag("temp").iter().all(|d| d.has_tag("kept")));
  assert!(engine.check_integrity().is_ok());
}

#[cfg(feature = "parallel")]
#[test]
fn test_readers_and_writers_on_thread_pool() {
  let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
  hammer(engine(Arc::new(pool)));
}

#[cfg(feature = "parallel")]
#[test]
fn test_readers_and_writers_on_global_pool() {
  hammer(engine(Arc::new(GlobalPool)));
}

#[test]
fn test_readers_and_writers_sequential() {
  hammer(engine(Arc::new(Sequential)));
}
