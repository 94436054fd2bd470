//! Sectioning, deduplication, and compression of context chunks.

use std::collections::HashSet;

use super::score::{keyword_density, tokenize};
use super::ContextChunk;

/// Normalized-prefix length used for near-duplicate fingerprints.
const FINGERPRINT_LEN: usize = 60;

/// A contiguous span of document text treated as a scoring unit.
#[derive(Debug, Clone)]
pub struct Section {
    /// Byte offset of the section start within the full document.
    pub offset: usize,
    pub text: String,
}

/// Split a document into sections at paragraph and fence boundaries.
///
/// A fenced code block is always one section, blank lines inside it
/// included; prose splits at runs of blank lines.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_start: Option<usize> = None;
    let mut current_end = 0usize;
    let mut in_fence = false;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let is_fence = trimmed.starts_with("```");
        let is_blank = trimmed.is_empty();

        if is_blank && !in_fence {
            if let Some(start) = current_start.take() {
                push_section(&mut sections, text, start, current_end);
            }
        } else {
            if current_start.is_none() {
                current_start = Some(offset);
            }
            current_end = offset + line.len();
            if is_fence {
                in_fence = !in_fence;
                // A closing fence ends the section immediately
                if !in_fence {
                    if let Some(start) = current_start.take() {
                        push_section(&mut sections, text, start, current_end);
                    }
                }
            }
        }

        offset += line.len();
    }

    if let Some(start) = current_start {
        push_section(&mut sections, text, start, current_end);
    }

    sections
}

fn push_section(sections: &mut Vec<Section>, text: &str, start: usize, end: usize) {
    let body = text[start..end].trim_end();
    if !body.trim().is_empty() {
        sections.push(Section {
            offset: start,
            text: body.to_string(),
        });
    }
}

/// Normalized prefix of a chunk used to detect near-duplicates: lowercased,
/// whitespace collapsed to single spaces, cut to [`FINGERPRINT_LEN`] chars.
pub fn fingerprint(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .take(FINGERPRINT_LEN)
        .collect()
}

/// Drop chunks whose fingerprint matches one already kept.
///
/// Input must be sorted by descending score so that the highest-scoring
/// member of a fingerprint-tied group survives. Idempotent.
pub fn remove_duplicates(chunks: Vec<ContextChunk>) -> Vec<ContextChunk> {
    let mut seen: HashSet<String> = HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(fingerprint(&chunk.text)))
        .collect()
}

/// Bound each chunk to `cap` characters by keeping its most informative
/// sentences.
///
/// Sentences are ranked by raw length, ties broken by keyword density
/// against `reference_text` (the local window), then re-emitted in their
/// original order. A single over-long sentence is cut at a char boundary.
pub fn compress_chunks(
    chunks: Vec<ContextChunk>,
    cap: usize,
    reference_text: &str,
) -> Vec<ContextChunk> {
    let reference = tokenize(reference_text);
    chunks
        .into_iter()
        .map(|chunk| {
            if chunk.text.len() <= cap {
                return chunk;
            }
            let text = compress_text(&chunk.text, cap, &reference);
            ContextChunk { text, ..chunk }
        })
        .collect()
}

fn compress_text(text: &str, cap: usize, reference: &HashSet<String>) -> String {
    let sentences = split_sentences(text);

    // Rank sentence indices: longest first, keyword density breaks ties
    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    ranked.sort_by(|&a, &b| {
        sentences[b]
            .len()
            .cmp(&sentences[a].len())
            .then_with(|| {
                keyword_density(sentences[b], reference)
                    .partial_cmp(&keyword_density(sentences[a], reference))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut kept = vec![false; sentences.len()];
    let mut used = 0usize;
    for &i in &ranked {
        let len = sentences[i].len() + if used > 0 { 1 } else { 0 };
        if used + len <= cap {
            kept[i] = true;
            used += len;
        }
    }

    let selected: Vec<&str> = sentences
        .iter()
        .enumerate()
        .filter(|(i, _)| kept[*i])
        .map(|(_, s)| *s)
        .collect();

    if selected.is_empty() {
        // No whole sentence fits — fall back to a clean prefix cut
        return truncate_at_boundary(text, cap);
    }

    selected.join(" ")
}

/// Split text into trimmed sentences at `.`, `!`, `?` followed by
/// whitespace, or at line breaks.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let bytes = text.as_bytes();

    for (i, c) in text.char_indices() {
        let at_terminator = matches!(c, '.' | '!' | '?')
            && bytes
                .get(i + 1)
                .map(|b| b.is_ascii_whitespace())
                .unwrap_or(true);
        if at_terminator || c == '\n' {
            let end = if c == '\n' { i } else { i + 1 };
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = i + c.len_utf8();
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn truncate_at_boundary(text: &str, cap: usize) -> String {
    let end = text
        .char_indices()
        .take_while(|(i, _)| *i < cap)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
        .min(cap.min(text.len()));
    let mut end = end;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, score: f64) -> ContextChunk {
        ContextChunk {
            text: text.to_string(),
            source_offset: 0,
            score,
        }
    }

    #[test]
    fn splits_at_paragraph_boundaries() {
        let sections = split_sections("First paragraph.\n\nSecond paragraph.\n\nThird.");
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text, "First paragraph.");
        assert_eq!(sections[1].text, "Second paragraph.");
        assert!(sections[1].offset > sections[0].offset);
    }

    #[test]
    fn fenced_block_is_one_section() {
        let text = "Intro.\n\n```rust\nfn a() {}\n\nfn b() {}\n```\n\nOutro.";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 3);
        assert!(sections[1].text.contains("fn a()"));
        assert!(sections[1].text.contains("fn b()"));
        assert!(sections[1].text.starts_with("```"));
        assert!(sections[1].text.ends_with("```"));
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(split_sections("").is_empty());
        assert!(split_sections("\n\n\n").is_empty());
    }

    #[test]
    fn section_offsets_match_document_positions() {
        let text = "alpha\n\nbravo";
        let sections = split_sections(text);
        assert_eq!(&text[sections[1].offset..sections[1].offset + 5], "bravo");
    }

    #[test]
    fn fingerprint_collapses_whitespace_and_case() {
        assert_eq!(
            fingerprint("Hello   World\n  again"),
            fingerprint("hello world again")
        );
    }

    #[test]
    fn dedup_keeps_highest_scoring_of_tied_group() {
        let chunks = vec![
            chunk("same opening text in both of these chunks", 0.9),
            chunk("same opening text in both of these chunks", 0.4),
            chunk("a different chunk entirely", 0.5),
        ];
        let deduped = remove_duplicates(chunks);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].score, 0.9);
    }

    #[test]
    fn dedup_is_idempotent() {
        let chunks = vec![
            chunk("first unique chunk with plenty of words", 0.8),
            chunk("second unique chunk with other words", 0.6),
        ];
        let once = remove_duplicates(chunks);
        let twice = remove_duplicates(once.clone());
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn compression_respects_cap() {
        let long = "The memory engine keeps a bounded store. Eviction removes the oldest entries when capacity is reached. Each record carries access statistics for ranking. Searches score every record by cosine similarity against the query embedding.";
        let out = compress_chunks(vec![chunk(long, 0.5)], 120, "memory eviction capacity");
        assert_eq!(out.len(), 1);
        assert!(out[0].text.len() <= 120, "len {}", out[0].text.len());
        assert!(!out[0].text.is_empty());
    }

    #[test]
    fn short_chunks_pass_through_unchanged() {
        let out = compress_chunks(vec![chunk("short text", 0.5)], 250, "reference");
        assert_eq!(out[0].text, "short text");
    }

    #[test]
    fn compression_preserves_sentence_boundaries() {
        let text = "Alpha sentence one. Beta sentence two is a bit longer. Gamma three.";
        let out = compress_chunks(vec![chunk(text, 0.5)], 45, "");
        // Output is made of whole sentences from the input
        for sentence in out[0].text.split(". ") {
            let sentence = sentence.trim_end_matches('.');
            assert!(text.contains(sentence), "unexpected fragment: {sentence}");
        }
    }

    #[test]
    fn single_overlong_sentence_is_cut_at_cap() {
        let text = "word ".repeat(100);
        let out = compress_chunks(vec![chunk(text.trim(), 0.5)], 50, "");
        assert!(out[0].text.len() <= 50);
    }

    #[test]
    fn sentence_splitter_handles_terminators() {
        let sentences = split_sentences("One. Two! Three? Four");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
    }
}
