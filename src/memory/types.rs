//! Semantic memory type definitions.
//!
//! Defines [`SemanticMemoryItem`] (what callers get back), [`StoredMemory`]
//! (the persisted record with access statistics), [`ScoredMemory`] (a search
//! hit), [`SearchOptions`], and [`MemoryStats`].

use serde::{Deserialize, Serialize};

use crate::config::MemoryConfig;

/// A remembered text snippet with its embedding, as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticMemoryItem {
    /// UUID v7 (time-sortable) identifier.
    pub id: String,
    pub text: String,
    /// Term-frequency vector sized to the vocabulary as of this item's last
    /// retraining.
    pub embedding: Vec<f32>,
    /// Arbitrary JSON metadata supplied at insert time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// The durable form of a memory: item fields plus access statistics.
///
/// Owned exclusively by the engine; the store only mirrors it. The
/// in-memory index is the source of truth during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMemory {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 timestamp of the most recent search hit or creation.
    pub last_accessed_at: String,
    /// Number of times this memory has been returned in search results.
    pub access_count: u32,
}

impl StoredMemory {
    pub fn item(&self) -> SemanticMemoryItem {
        SemanticMemoryItem {
            id: self.id.clone(),
            text: self.text.clone(),
            embedding: self.embedding.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A single search result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMemory {
    pub id: String,
    pub text: String,
    /// Cosine similarity against the query embedding.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Knobs for one search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub top_k: usize,
    /// Results scoring below this cosine similarity are dropped.
    pub min_semantic_score: f64,
    /// When true, results whose lexical Jaccard similarity to the query
    /// exceeds `max_jaccard_score` are excluded — suppresses near-verbatim
    /// copies of the query that would otherwise dominate.
    pub enable_jaccard_filter: bool,
    pub max_jaccard_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&MemoryConfig::default())
    }
}

impl From<&MemoryConfig> for SearchOptions {
    fn from(config: &MemoryConfig) -> Self {
        Self {
            top_k: config.default_top_k,
            min_semantic_score: config.min_semantic_score,
            enable_jaccard_filter: false,
            max_jaccard_score: config.max_jaccard_score,
        }
    }
}

/// Aggregate statistics over the in-memory index.
#[derive(Debug, Serialize)]
pub struct MemoryStats {
    pub total_memories: usize,
    /// Dimension of the embedding space as of the last retraining.
    pub vocabulary_size: usize,
    pub total_accesses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<String>,
}
