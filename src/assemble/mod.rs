//! Context assembly orchestration.
//!
//! [`ContextAssembler`] merges the lexical context engine's output, the
//! structure analyzer's instruction, and caller-supplied pinned notes into
//! one bounded [`PromptPayload`] for the generative backend. Every
//! sub-component degrades independently: a missing semantic engine or an
//! empty document narrows the payload down to the local window, it never
//! fails the request.

pub mod generate;

pub use generate::{
    Availability, AvailabilityCache, CapabilityProvider, GenerateError, Generator,
    TimeoutGenerator,
};

use serde::Serialize;
use tracing::debug;

use crate::config::InklingConfig;
use crate::context::score::keyword_overlap_score;
use crate::context::{assemble_context, format_for_prompt, ContextOptions};
use crate::memory::SemanticMemoryEngine;
use crate::structure::{analyze_cursor_context, build_context_instructions, detect_document_type};

/// Options for the assembler, beyond the lexical [`ContextOptions`].
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    pub context: ContextOptions,
    /// Maximum number of pinned notes merged into the payload.
    pub max_pinned_notes: usize,
    /// Per-note character cap.
    pub note_char_cap: usize,
    /// Notes ranking below this relevance are left out entirely.
    pub min_note_relevance: f64,
    /// Hard ceiling on the rendered prompt.
    pub prompt_char_budget: usize,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            context: ContextOptions::default(),
            max_pinned_notes: 3,
            note_char_cap: 200,
            min_note_relevance: 0.05,
            prompt_char_budget: 3000,
        }
    }
}

impl From<&InklingConfig> for AssemblerOptions {
    fn from(config: &InklingConfig) -> Self {
        Self {
            context: ContextOptions::from(&config.context),
            ..Self::default()
        }
    }
}

/// The bounded payload handed to the generative backend.
#[derive(Debug, Clone, Serialize)]
pub struct PromptPayload {
    /// Structural constraint from the analyzer; empty means no constraint.
    pub instruction: String,
    /// Formatted lexical context block (local window + related chunks).
    pub context: String,
    /// Relevant pinned notes, most relevant first.
    pub notes: Vec<String>,
    /// Length in bytes of the rendered prompt, formatting included.
    pub total_chars: usize,
}

impl PromptPayload {
    /// Render the payload as a single prompt string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.instruction.is_empty() {
            out.push_str(&self.instruction);
            out.push_str("\n\n");
        }
        for note in &self.notes {
            out.push_str("Note: ");
            out.push_str(note);
            out.push('\n');
        }
        if !self.notes.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.context);
        out
    }
}

pub struct ContextAssembler {
    options: AssemblerOptions,
}

impl ContextAssembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    /// Build a bounded prompt payload for a generation request at
    /// `cursor_pos`.
    ///
    /// `memory` is optional: without it, pinned notes are ranked by lexical
    /// keyword overlap instead of the semantic embedding space. The result
    /// is always well-formed; worst case it carries only the local window.
    pub fn assemble(
        &self,
        text: &str,
        cursor_pos: usize,
        pinned_notes: &[String],
        memory: Option<&SemanticMemoryEngine>,
    ) -> PromptPayload {
        let doc_type = detect_document_type(text);
        let cursor = analyze_cursor_context(text, cursor_pos);
        let instruction = build_context_instructions(&doc_type, &cursor);

        let assembled = assemble_context(text, cursor_pos, &self.options.context);
        let context = format_for_prompt(
            &assembled,
            true,
            self.options.context.total_char_budget + 128,
        );

        let notes = self.select_notes(&assembled.local_context, pinned_notes, memory);

        let mut payload = PromptPayload {
            total_chars: 0,
            instruction,
            context,
            notes,
        };
        self.enforce_budget(&mut payload);

        debug!(
            kind = %doc_type.kind,
            chunks = assembled.related_chunks.len(),
            notes = payload.notes.len(),
            chars = payload.total_chars,
            "context assembled"
        );
        payload
    }

    /// Rank pinned notes against the local window and keep the most
    /// relevant few, each capped in length.
    fn select_notes(
        &self,
        local_context: &str,
        pinned_notes: &[String],
        memory: Option<&SemanticMemoryEngine>,
    ) -> Vec<String> {
        if pinned_notes.is_empty() || local_context.is_empty() {
            return Vec::new();
        }

        let refs: Vec<&str> = pinned_notes.iter().map(|n| n.as_str()).collect();
        let scores = match memory {
            Some(engine) => engine.rank_texts(local_context, &refs),
            None => refs
                .iter()
                .map(|n| keyword_overlap_score(local_context, n))
                .collect(),
        };

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s >= self.options.min_note_relevance)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(self.options.max_pinned_notes);

        ranked
            .into_iter()
            .map(|(i, _)| truncate_chars(&pinned_notes[i], self.options.note_char_cap))
            .collect()
    }

    /// Enforce the overall prompt ceiling on the **rendered** length, note
    /// prefixes and separators included: drop notes from the least relevant
    /// end first, then cut the context block itself.
    fn enforce_budget(&self, payload: &mut PromptPayload) {
        let budget = self.options.prompt_char_budget;

        while payload_len(payload) > budget && !payload.notes.is_empty() {
            payload.notes.pop();
        }
        let rendered = payload_len(payload);
        if rendered > budget {
            let overage = rendered - budget;
            let keep = payload.context.len().saturating_sub(overage);
            payload.context = truncate_chars(&payload.context, keep);
        }
        payload.total_chars = payload_len(payload);
    }

    /// Send a rendered payload to the backend, honoring the capability
    /// probe. Backend failure modes pass through unchanged.
    pub async fn generate(
        &self,
        generator: &dyn Generator,
        availability: &AvailabilityCache,
        payload: &PromptPayload,
    ) -> Result<String, GenerateError> {
        match availability.get() {
            Availability::Unavailable => Err(GenerateError::Unavailable),
            Availability::AfterDownload => Err(GenerateError::UserActivationRequired),
            Availability::Available => generator.generate(&payload.render()).await,
        }
    }
}

fn payload_len(payload: &PromptPayload) -> usize {
    payload.render().len()
}

fn truncate_chars(text: &str, cap: usize) -> String {
    let mut end = cap.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
