//! Trainable local embedding pipeline.
//!
//! [`LocalEmbedder`] maintains a vocabulary built from remembered text and
//! produces term-frequency vectors sized to that vocabulary. There is no
//! model file and no tensor math — the embedder trades semantic
//! sophistication for determinism, speed, and a small footprint.
//!
//! Texts embedded between [`LocalEmbedder::train`] calls may contain
//! out-of-vocabulary terms that the current vectors cannot represent. This
//! is an accepted approximation: the engine retrains periodically rather
//! than on every insert.

use std::collections::HashMap;

use crate::context::score::tokenize;

/// Token -> index mapping underlying the embedder. Rebuilt by `train`.
pub type Vocabulary = HashMap<String, usize>;

/// A local term-frequency embedder over a growing vocabulary.
#[derive(Debug, Default)]
pub struct LocalEmbedder {
    vocabulary: Vocabulary,
}

impl LocalEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dimensions current embeddings carry.
    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    /// Embed a text under the current vocabulary: L2-normalized term
    /// frequencies. Unknown tokens are ignored. Returns an all-zero vector
    /// when nothing in the text is in vocabulary.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .map(|t| t.to_lowercase())
        {
            if let Some(&idx) = self.vocabulary.get(&token) {
                vector[idx] += 1.0;
            }
        }
        l2_normalize(&mut vector);
        vector
    }

    /// Rebuild the vocabulary from the full corpus and return a fresh
    /// embedding for every text, in input order. Every returned vector has
    /// dimension equal to the new vocabulary size.
    pub fn train(&mut self, corpus: &[&str]) -> Vec<Vec<f32>> {
        let mut vocabulary: Vocabulary = HashMap::new();
        for text in corpus {
            let mut tokens: Vec<String> = tokenize(text).into_iter().collect();
            // HashSet iteration order is arbitrary; sort for a stable index
            tokens.sort();
            for token in tokens {
                let next = vocabulary.len();
                vocabulary.entry(token).or_insert(next);
            }
        }
        self.vocabulary = vocabulary;

        corpus.iter().map(|text| self.embed(text)).collect()
    }

    /// Drop the vocabulary entirely.
    pub fn reset(&mut self) {
        self.vocabulary.clear();
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity between two vectors. Mismatched dimensions and zero
/// vectors score 0.0 rather than erroring — stale embeddings from before a
/// retrain simply stop matching.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untrained_embedder_produces_empty_vectors() {
        let embedder = LocalEmbedder::new();
        assert_eq!(embedder.dimensions(), 0);
        assert!(embedder.embed("anything at all").is_empty());
    }

    #[test]
    fn train_builds_vocabulary_from_corpus() {
        let mut embedder = LocalEmbedder::new();
        let embeddings = embedder.train(&["rust memory safety", "memory allocation patterns"]);

        assert!(embedder.dimensions() >= 4);
        assert_eq!(embeddings.len(), 2);
        for emb in &embeddings {
            assert_eq!(emb.len(), embedder.dimensions());
        }
    }

    #[test]
    fn embeddings_are_l2_normalized() {
        let mut embedder = LocalEmbedder::new();
        embedder.train(&["alpha bravo charlie delta"]);
        let emb = embedder.embed("alpha bravo");
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn similar_texts_score_higher_than_dissimilar() {
        let mut embedder = LocalEmbedder::new();
        embedder.train(&[
            "the memory engine evicts old records",
            "cooking pasta requires salted water",
        ]);

        let query = embedder.embed("memory records eviction");
        let close = embedder.embed("the memory engine evicts old records");
        let far = embedder.embed("cooking pasta requires salted water");

        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn out_of_vocabulary_tokens_are_ignored() {
        let mut embedder = LocalEmbedder::new();
        embedder.train(&["known words only"]);
        let emb = embedder.embed("completely unknown vocabulary");
        assert!(emb.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn retraining_changes_dimensions() {
        let mut embedder = LocalEmbedder::new();
        embedder.train(&["first corpus text"]);
        let dim_before = embedder.dimensions();
        embedder.train(&["first corpus text", "second text with more distinct words"]);
        assert!(embedder.dimensions() > dim_before);
    }

    #[test]
    fn cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn reset_clears_vocabulary() {
        let mut embedder = LocalEmbedder::new();
        embedder.train(&["some corpus"]);
        embedder.reset();
        assert_eq!(embedder.dimensions(), 0);
    }
}
