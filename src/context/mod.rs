//! Lexical context engine.
//!
//! [`assemble_context`] is the pure pipeline at the heart of the crate:
//! extract a local window around the cursor, split the document into
//! sections, rank sections against the window by keyword overlap,
//! deduplicate, compress, and bound everything to a character budget.
//! Identical inputs always produce identical output and there are no side
//! effects, so the pipeline is safe to call concurrently.

pub mod chunks;
pub mod score;

use serde::{Deserialize, Serialize};

use crate::config::ContextConfig;
use crate::structure::cursor::clamp_to_char_boundary;
use chunks::{compress_chunks, remove_duplicates, split_sections};
use score::keyword_overlap_score;

/// Options for one context-assembly call.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Size of the local window around the cursor, in characters.
    pub local_window: usize,
    /// Maximum number of related sections to keep.
    pub max_related_sections: usize,
    /// Sections scoring below this are discarded.
    pub min_relevance: f64,
    /// Per-chunk character cap applied during compression.
    pub chunk_char_cap: usize,
    /// Hard ceiling on the assembled block, related chunks included.
    pub total_char_budget: usize,
    /// When false, related-section scoring is skipped entirely.
    pub enable_relevance_scoring: bool,
    /// When false, fingerprint deduplication is skipped.
    pub enable_deduplication: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self::from(&ContextConfig::default())
    }
}

impl From<&ContextConfig> for ContextOptions {
    fn from(config: &ContextConfig) -> Self {
        Self {
            local_window: config.local_window,
            max_related_sections: config.max_related_sections,
            min_relevance: config.min_relevance,
            chunk_char_cap: config.chunk_char_cap,
            total_char_budget: config.total_char_budget,
            enable_relevance_scoring: true,
            enable_deduplication: true,
        }
    }
}

/// A document section selected as relevant context. Transient — produced per
/// call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextChunk {
    pub text: String,
    /// Byte offset of the originating section in the full document.
    pub source_offset: usize,
    /// Keyword-overlap score against the local window.
    pub score: f64,
}

/// Output of [`assemble_context`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Contiguous window around the cursor.
    pub local_context: String,
    /// Related sections, highest score first, fingerprint-unique.
    pub related_chunks: Vec<ContextChunk>,
    /// Characters across the window and all related chunks.
    pub total_chars: usize,
}

/// Extract a contiguous window of at most `window` bytes centered on
/// `cursor_pos`, clamped to the document bounds. The returned slice always
/// contains the (boundary-snapped) cursor position.
pub fn local_context(text: &str, cursor_pos: usize, window: usize) -> &str {
    if text.is_empty() || window == 0 {
        return "";
    }
    let pos = clamp_to_char_boundary(text, cursor_pos);
    let half = window / 2;

    let mut start = pos.saturating_sub(half);
    while start < text.len() && !text.is_char_boundary(start) {
        start += 1;
    }
    let mut end = (pos + half).min(text.len());
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[start..end]
}

/// Run the full lexical pipeline over a document.
pub fn assemble_context(full_text: &str, cursor_pos: usize, options: &ContextOptions) -> AssembledContext {
    let window = local_context(full_text, cursor_pos, options.local_window);
    let pos = clamp_to_char_boundary(full_text, cursor_pos);
    let window_start = pos.saturating_sub(options.local_window / 2);
    let window_end = (pos + options.local_window / 2).min(full_text.len());

    let mut related = Vec::new();
    if options.enable_relevance_scoring && !window.is_empty() {
        let sections = split_sections(full_text);

        let mut scored: Vec<ContextChunk> = sections
            .into_iter()
            // Sections overlapping the window are already in the local context
            .filter(|s| {
                let s_end = s.offset + s.text.len();
                s_end <= window_start || s.offset >= window_end
            })
            .map(|s| ContextChunk {
                score: keyword_overlap_score(&s.text, window),
                source_offset: s.offset,
                text: s.text,
            })
            .filter(|c| c.score >= options.min_relevance)
            .collect();

        // Stable, deterministic: score descending, earlier offset on ties
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source_offset.cmp(&b.source_offset))
        });

        if options.enable_deduplication {
            scored = remove_duplicates(scored);
        }
        scored.truncate(options.max_related_sections);

        related = compress_chunks(scored, options.chunk_char_cap, window);
    }

    // Enforce the overall budget: the window is always kept (trimmed if it
    // alone exceeds the budget); chunks are dropped from the bottom.
    let mut local = window.to_string();
    if local.len() > options.total_char_budget {
        local = chunks_truncate(&local, options.total_char_budget);
    }
    let mut total = local.len();
    let mut kept = Vec::new();
    for chunk in related {
        if total + chunk.text.len() > options.total_char_budget {
            continue;
        }
        total += chunk.text.len();
        kept.push(chunk);
    }

    AssembledContext {
        local_context: local,
        related_chunks: kept,
        total_chars: total,
    }
}

/// Render an assembled context into a single prompt block, enforcing a hard
/// character ceiling regardless of how many chunks survived the pipeline.
pub fn format_for_prompt(context: &AssembledContext, include_related: bool, max_chars: usize) -> String {
    let mut out = String::new();
    out.push_str("Text near the cursor:\n");
    out.push_str(&context.local_context);

    if include_related && !context.related_chunks.is_empty() {
        out.push_str("\n\nRelated material from this document:\n");
        for chunk in &context.related_chunks {
            let entry = format!("- {}\n", chunk.text);
            if out.len() + entry.len() > max_chars {
                break;
            }
            out.push_str(&entry);
        }
    }

    if out.len() > max_chars {
        out = chunks_truncate(&out, max_chars);
    }
    out
}

fn chunks_truncate(text: &str, cap: usize) -> String {
    let mut end = cap.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
