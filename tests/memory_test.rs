mod helpers;

use helpers::{seed_corpus, test_engine};
use inkling::memory::SearchOptions;

#[test]
fn add_then_search_finds_related_memory() {
    let mut engine = test_engine(100);
    for text in seed_corpus() {
        engine.add_memory(text, None);
    }

    let results = engine.search("kubernetes staging deployment", &SearchOptions::default());
    assert!(!results.is_empty());
    assert!(results[0].text.contains("kubernetes"));
}

#[test]
fn search_results_stay_within_top_k() {
    let mut engine = test_engine(100);
    for i in 0..20 {
        engine.add_memory(&format!("shared topic entry {i} about sailing knots"), None);
    }
    let options = SearchOptions {
        top_k: 3,
        ..SearchOptions::default()
    };
    let results = engine.search("sailing knots", &options);
    assert!(results.len() <= 3);
}

#[test]
fn jaccard_filter_suppresses_near_verbatim_results() {
    let mut engine = test_engine(100);
    engine.add_memory("the quick brown fox jumps over the lazy dog", None);
    engine.add_memory("quick foxes and dogs feature in typing exercises", None);

    let options = SearchOptions {
        enable_jaccard_filter: true,
        max_jaccard_score: 0.8,
        min_semantic_score: 0.0,
        ..SearchOptions::default()
    };
    let results = engine.search("the quick brown fox jumps over the lazy dog", &options);
    assert!(results
        .iter()
        .all(|r| !r.text.contains("lazy dog")));
}

#[test]
fn capacity_eviction_keeps_recently_accessed() {
    let mut engine = test_engine(5);
    for text in seed_corpus() {
        engine.add_memory(text, None);
    }
    assert_eq!(engine.len(), 5);

    // At capacity the next insert evicts the least-recently-accessed slice.
    engine.add_memory("sixth entry about orbital mechanics homework", None);
    assert!(engine.len() <= 5);

    let results = engine.search("orbital mechanics", &SearchOptions::default());
    assert!(results.iter().any(|r| r.text.contains("orbital")));
}

#[test]
fn remove_and_clear() {
    let mut engine = test_engine(100);
    let item = engine.add_memory("temporary scratch note", None);
    assert_eq!(engine.len(), 1);

    engine.remove_memory(&item.id).unwrap();
    assert!(engine.is_empty());
    assert!(engine.remove_memory(&item.id).is_err());

    engine.add_memory("another note", None);
    engine.clear_all().unwrap();
    assert!(engine.is_empty());
}

#[test]
fn stats_track_corpus_and_vocabulary() {
    let mut engine = test_engine(100);
    for text in seed_corpus() {
        engine.add_memory(text, None);
    }
    let stats = engine.stats();
    assert_eq!(stats.total_memories, 5);
    assert!(stats.vocabulary_size > 0);
    assert!(stats.oldest_memory.is_some());
    assert!(stats.newest_memory.is_some());
}
