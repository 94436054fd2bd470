//! Keyword-overlap relevance scoring.
//!
//! The tokenizer and stopword set here are the single swappable policy for
//! all lexical scoring in the crate: word-boundary splitting, lowercased,
//! tokens shorter than three characters dropped, plus a small fixed English
//! stopword list. [`keyword_overlap_score`] computes Jaccard similarity over
//! the resulting token sets.

use std::collections::HashSet;

/// Minimum token length kept by the tokenizer.
const MIN_TOKEN_LEN: usize = 3;

/// Small fixed stopword list. High-frequency function words only — anything
/// domain-specific stays in the token set.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "way", "who", "did", "that", "this", "with", "from", "they", "have", "will",
    "been", "were", "when", "what", "your", "which", "their", "would", "there", "about", "could",
    "other", "into", "than", "then", "them", "these", "some", "only", "also", "just", "over",
];

/// Split text into the set of scoring tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|t| t.to_lowercase())
        .filter(|t| t.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Jaccard similarity between the token sets of two texts.
///
/// Symmetric, bounded to `[0, 1]`. Identical non-empty texts score 1.0 even
/// when their tokens are all stopwords; disjoint token sets score 0.0.
pub fn keyword_overlap_score(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        let (a, b) = (a.trim(), b.trim());
        return if !a.is_empty() && a == b { 1.0 } else { 0.0 };
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Fraction of a text's tokens that also appear in `reference` — used as the
/// tie-breaker when ranking sentences during compression.
pub fn keyword_density(text: &str, reference: &HashSet<String>) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| reference.contains(*t)).count();
    hits as f64 / tokens.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_symmetric() {
        let a = "the quick brown fox jumps over the lazy dog";
        let b = "a lazy dog sleeps under the brown fence";
        assert_eq!(keyword_overlap_score(a, b), keyword_overlap_score(b, a));
    }

    #[test]
    fn identical_text_scores_one() {
        let text = "context assembly for constrained backends";
        assert_eq!(keyword_overlap_score(text, text), 1.0);
    }

    #[test]
    fn disjoint_texts_score_zero() {
        assert_eq!(
            keyword_overlap_score("alpha bravo charlie", "delta echo foxtrot"),
            0.0
        );
    }

    #[test]
    fn score_is_bounded() {
        let pairs = [
            ("some shared words here", "shared words appear here too"),
            ("", "nonempty text"),
            ("one two", "one two three four"),
        ];
        for (a, b) in pairs {
            let s = keyword_overlap_score(a, b);
            assert!((0.0..=1.0).contains(&s), "score {s} out of bounds");
        }
    }

    #[test]
    fn identical_stopword_only_text_scores_one() {
        assert_eq!(keyword_overlap_score("the and for", "the and for"), 1.0);
    }

    #[test]
    fn empty_texts_score_zero() {
        assert_eq!(keyword_overlap_score("", ""), 0.0);
    }

    #[test]
    fn stopwords_and_short_tokens_are_excluded() {
        let tokens = tokenize("The cat and a dog ran to it");
        assert!(tokens.contains("cat"));
        assert!(tokens.contains("dog"));
        assert!(tokens.contains("ran"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("and"));
        assert!(!tokens.contains("a"));
        assert!(!tokens.contains("it"));
    }

    #[test]
    fn tokenizer_lowercases() {
        let tokens = tokenize("Rust RUST rust");
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("rust"));
    }

    #[test]
    fn density_counts_reference_hits() {
        let reference = tokenize("memory eviction policy");
        assert_eq!(keyword_density("memory eviction", &reference), 1.0);
        assert_eq!(keyword_density("unrelated words entirely", &reference), 0.0);
    }
}
