//! Context assembly and relevance retrieval for a local-first writing
//! assistant.
//!
//! Inkling turns a full document plus a cursor position into a compact,
//! budget-bounded prompt for a local generative backend. It blends three
//! sources of context:
//!
//! - the **local window** of text around the cursor,
//! - **related sections** of the same document, scored by keyword overlap,
//! - **semantic memories** and pinned notes, scored against a lightweight
//!   term-frequency embedding space trained on the stored corpus.
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL mode) through the [`memory::MemoryStore`]
//!   trait; an in-memory store backs tests and ephemeral sessions
//! - **Embeddings**: vocabulary-based term-frequency vectors, L2-normalized,
//!   retrained from the stored corpus (no model download required)
//! - **Assembly**: structural analysis (document type, cursor context)
//!   drives the generation instruction; lexical and semantic retrieval fill
//!   the remaining character budget
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`structure`] — Document type detection, cursor analysis, titles, instructions
//! - [`context`] — Lexical context engine: windowing, chunk scoring, compression
//! - [`embedding`] — Local term-frequency embedder and cosine similarity
//! - [`memory`] — Semantic memory engine: add, search, evict, persist
//! - [`db`] — SQLite-backed memory store and schema management
//! - [`assemble`] — Prompt payload assembly and the generative backend contract

pub mod assemble;
pub mod config;
pub mod context;
pub mod db;
pub mod embedding;
pub mod memory;
pub mod structure;

use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr with the configured log level.
///
/// Falls back to `info` when the configured directive does not parse.
/// Calling this twice is an error in tracing-subscriber, so embedding
/// applications that install their own subscriber should skip it.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
