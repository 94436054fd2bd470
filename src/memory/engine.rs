//! The semantic memory engine — the only stateful component in the crate.
//!
//! Wraps a [`LocalEmbedder`] and a capacity-bounded in-memory index, mirrored
//! to a [`MemoryStore`]. The index is the source of truth during a session;
//! the store is loaded once at initialization and written through
//! best-effort afterwards. Mutating operations require `&mut self` — callers
//! serialize writers around one engine instance.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::MemoryConfig;
use crate::context::score::keyword_overlap_score;
use crate::embedding::{cosine_similarity, LocalEmbedder};

use super::store::MemoryStore;
use super::types::{MemoryStats, ScoredMemory, SearchOptions, SemanticMemoryItem, StoredMemory};

/// Fraction of the index evicted when capacity is reached, as a divisor
/// (5 = oldest 20% by last access).
const EVICTION_DIVISOR: usize = 5;

pub struct SemanticMemoryEngine {
    embedder: LocalEmbedder,
    items: HashMap<String, StoredMemory>,
    store: Arc<dyn MemoryStore>,
    config: MemoryConfig,
    inserts_since_train: usize,
}

impl SemanticMemoryEngine {
    /// Initialize the engine from a durable store.
    ///
    /// A store read failure is downgraded to an empty engine with a warning —
    /// callers always get a usable engine, never an error, at startup.
    pub fn new(store: Arc<dyn MemoryStore>, config: MemoryConfig) -> Self {
        let loaded = match store.get_all() {
            Ok(records) => records,
            Err(e) => {
                warn!("failed to load memories, starting empty: {e:#}");
                Vec::new()
            }
        };

        let mut engine = Self {
            embedder: LocalEmbedder::new(),
            items: loaded.into_iter().map(|r| (r.id.clone(), r)).collect(),
            store,
            config,
            inserts_since_train: 0,
        };

        // The vocabulary is not persisted — rebuild it from the loaded
        // corpus so every embedding matches the session's embedding space.
        if !engine.items.is_empty() {
            engine.retrain();
        }

        info!(count = engine.items.len(), "semantic memory initialized");
        engine
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Search options derived from this engine's configuration.
    ///
    /// Callers that do not build their own [`SearchOptions`] should start
    /// from these so that configured thresholds (`min_semantic_score`,
    /// `max_jaccard_score`, `default_top_k`) actually apply.
    pub fn default_search_options(&self) -> SearchOptions {
        SearchOptions::from(&self.config)
    }

    /// Remember a text snippet.
    ///
    /// When the index is at capacity, the least-recently-accessed ~20% of
    /// records are evicted **before** the insert. The embedder is retrained
    /// every `train_interval` insertions rather than on every call.
    pub fn add_memory(
        &mut self,
        text: &str,
        metadata: Option<serde_json::Value>,
    ) -> SemanticMemoryItem {
        if self.config.max_memories > 0 && self.items.len() >= self.config.max_memories {
            self.evict_oldest();
        }

        let now = chrono::Utc::now().to_rfc3339();
        let record = StoredMemory {
            id: uuid::Uuid::now_v7().to_string(),
            text: text.to_string(),
            embedding: self.embedder.embed(text),
            metadata,
            created_at: now.clone(),
            last_accessed_at: now,
            access_count: 0,
        };

        let item = record.item();
        self.persist(&record);
        self.items.insert(record.id.clone(), record);

        self.inserts_since_train += 1;
        if self.inserts_since_train >= self.config.train_interval.max(1) {
            self.retrain();
            self.inserts_since_train = 0;
        }

        item
    }

    /// Score every stored item against the query by cosine similarity.
    ///
    /// With the Jaccard filter enabled, items lexically near-identical to
    /// the query are excluded so verbatim copies do not crowd out genuinely
    /// related material. Access statistics for returned items are updated in
    /// memory and persisted fire-and-forget.
    pub fn search(&mut self, query: &str, options: &SearchOptions) -> Vec<ScoredMemory> {
        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<(String, f64)> = self
            .items
            .values()
            .filter_map(|item| {
                let score = cosine_similarity(&query_embedding, &item.embedding);
                if score < options.min_semantic_score {
                    return None;
                }
                if options.enable_jaccard_filter
                    && keyword_overlap_score(query, &item.text) > options.max_jaccard_score
                {
                    return None;
                }
                Some((item.id.clone(), score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(options.top_k);

        let now = chrono::Utc::now().to_rfc3339();
        let mut results = Vec::with_capacity(scored.len());
        let mut touched = Vec::with_capacity(scored.len());
        for (id, score) in scored {
            if let Some(item) = self.items.get_mut(&id) {
                item.access_count += 1;
                item.last_accessed_at = now.clone();
                touched.push(item.clone());
                results.push(ScoredMemory {
                    id: item.id.clone(),
                    text: item.text.clone(),
                    score,
                    metadata: item.metadata.clone(),
                });
            }
        }
        self.persist_access_stats(touched);

        debug!(results = results.len(), "semantic search complete");
        results
    }

    /// Remove a single memory from the index and the store.
    pub fn remove_memory(&mut self, id: &str) -> Result<()> {
        if self.items.remove(id).is_none() {
            bail!("memory not found: {id}");
        }
        if let Err(e) = self.store.delete(id) {
            warn!(id, "failed to delete memory from store: {e:#}");
        }
        Ok(())
    }

    /// Remove every memory from the index and the store, and reset the
    /// vocabulary. Fails only if the store cannot be cleared — the index is
    /// emptied regardless, so no orphans are served from memory.
    pub fn clear_all(&mut self) -> Result<()> {
        self.items.clear();
        self.embedder.reset();
        self.inserts_since_train = 0;
        self.store.clear().context("failed to clear memory store")
    }

    /// Rebuild the vocabulary from the current corpus and refresh every
    /// stored embedding.
    pub fn retrain(&mut self) {
        // Stable corpus order keeps the vocabulary indices deterministic
        let mut ids: Vec<String> = self.items.keys().cloned().collect();
        ids.sort();

        let texts: Vec<String> = ids
            .iter()
            .map(|id| self.items[id].text.clone())
            .collect();
        let corpus: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
        let embeddings = self.embedder.train(&corpus);

        for (id, embedding) in ids.iter().zip(embeddings) {
            if let Some(item) = self.items.get_mut(id) {
                item.embedding = embedding;
            }
        }
        for id in &ids {
            let record = self.items[id].clone();
            self.persist(&record);
        }

        debug!(
            vocabulary = self.embedder.dimensions(),
            items = self.items.len(),
            "embedder retrained"
        );
    }

    /// Rank arbitrary texts against a query under the current embedding
    /// space, returning one score per text in input order.
    ///
    /// Used by the assembler to filter pinned notes. When the vocabulary
    /// cannot represent the query at all (untrained engine or fully
    /// out-of-vocabulary text), falls back to lexical keyword overlap so
    /// ranking still degrades gracefully instead of zeroing out.
    pub fn rank_texts(&self, query: &str, texts: &[&str]) -> Vec<f64> {
        let query_embedding = self.embedder.embed(query);
        let semantic_usable = query_embedding.iter().any(|&x| x != 0.0);

        texts
            .iter()
            .map(|text| {
                if semantic_usable {
                    cosine_similarity(&query_embedding, &self.embedder.embed(text))
                } else {
                    keyword_overlap_score(query, text)
                }
            })
            .collect()
    }

    pub fn stats(&self) -> MemoryStats {
        let oldest = self.items.values().map(|i| i.created_at.clone()).min();
        let newest = self.items.values().map(|i| i.created_at.clone()).max();
        MemoryStats {
            total_memories: self.items.len(),
            vocabulary_size: self.embedder.dimensions(),
            total_accesses: self.items.values().map(|i| i.access_count as u64).sum(),
            oldest_memory: oldest,
            newest_memory: newest,
        }
    }

    /// Evict the least-recently-accessed ~20% of records (at least one).
    fn evict_oldest(&mut self) {
        let count = (self.items.len() / EVICTION_DIVISOR).max(1);

        let mut by_access: Vec<(String, String)> = self
            .items
            .values()
            .map(|i| (i.last_accessed_at.clone(), i.id.clone()))
            .collect();
        by_access.sort();

        let evicted: Vec<String> = by_access.into_iter().take(count).map(|(_, id)| id).collect();
        for id in &evicted {
            self.items.remove(id);
            if let Err(e) = self.store.delete(id) {
                warn!(id = %id, "failed to delete evicted memory from store: {e:#}");
            }
        }

        info!(count = evicted.len(), "evicted least-recently-accessed memories");
    }

    /// Best-effort write-through. A persistence failure is logged, never
    /// surfaced — the in-memory index keeps serving.
    fn persist(&self, record: &StoredMemory) {
        if let Err(e) = self.store.put(record) {
            warn!(id = %record.id, "failed to persist memory: {e:#}");
        }
    }

    /// Fire-and-forget persistence of updated access statistics. Runs on the
    /// tokio runtime when one is available so searches never wait on I/O.
    fn persist_access_stats(&self, records: Vec<StoredMemory>) {
        if records.is_empty() {
            return;
        }
        let store = Arc::clone(&self.store);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    for record in &records {
                        if let Err(e) = store.put(record) {
                            warn!(id = %record.id, "failed to persist access stats: {e:#}");
                        }
                    }
                });
            }
            Err(_) => {
                for record in &records {
                    if let Err(e) = store.put(record) {
                        warn!(id = %record.id, "failed to persist access stats: {e:#}");
                    }
                }
            }
        }
    }
}
