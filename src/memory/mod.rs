//! Semantic memory engine: trainable embedding index with capacity-bounded
//! eviction, cosine search, and store-agnostic persistence.

pub mod engine;
pub mod store;
pub mod types;

pub use engine::SemanticMemoryEngine;
pub use store::{InMemoryStore, MemoryStore};
pub use types::{MemoryStats, ScoredMemory, SearchOptions, SemanticMemoryItem, StoredMemory};
