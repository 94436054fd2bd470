//! Document structure analysis.
//!
//! Pure, total functions over raw text: document type classification
//! ([`detect_document_type`]), cursor position analysis
//! ([`analyze_cursor_context`]), smart titles ([`generate_smart_title`]),
//! and generation instructions ([`build_context_instructions`]). None of
//! these can fail — unrecognized structure resolves to the documented
//! defaults.

pub mod cursor;
pub mod detect;
pub mod instructions;
mod patterns;
pub mod title;
pub mod types;

pub use cursor::analyze_cursor_context;
pub use detect::detect_document_type;
pub use instructions::build_context_instructions;
pub use title::generate_smart_title;
pub use types::{CursorContext, DocumentKind, DocumentType, ListStyle};
