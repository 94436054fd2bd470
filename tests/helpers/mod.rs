#![allow(dead_code)]

use std::sync::Arc;

use inkling::config::MemoryConfig;
use inkling::db::SqliteStore;
use inkling::memory::{InMemoryStore, SemanticMemoryEngine};

/// Engine over an in-memory store with a small capacity, suitable for
/// eviction tests.
pub fn test_engine(max_memories: usize) -> SemanticMemoryEngine {
    let config = MemoryConfig {
        max_memories,
        train_interval: 1,
        ..MemoryConfig::default()
    };
    SemanticMemoryEngine::new(Arc::new(InMemoryStore::new()), config)
}

/// Engine backed by a fresh in-memory SQLite store.
pub fn sqlite_engine() -> SemanticMemoryEngine {
    let store = SqliteStore::open_in_memory().unwrap();
    let config = MemoryConfig {
        train_interval: 1,
        ..MemoryConfig::default()
    };
    SemanticMemoryEngine::new(Arc::new(store), config)
}

/// A small corpus of distinct snippets for seeding an engine.
pub fn seed_corpus() -> Vec<&'static str> {
    vec![
        "Quarterly report covers revenue growth and churn analysis",
        "Recipe for sourdough bread with a long cold fermentation",
        "Deployment checklist for the staging kubernetes cluster",
        "Birthday gift ideas for an amateur astronomer",
        "Meeting notes about the migration to the new billing system",
    ]
}
