//! Generation instruction synthesis.
//!
//! [`build_context_instructions`] turns a [`DocumentType`] and
//! [`CursorContext`] into a natural-language constraint for the generative
//! backend. Cursor flags are checked in strict priority order; document-type
//! guidance is the fallback. An empty string means "no forced structure".

use super::types::{CursorContext, DocumentKind, DocumentType, ListStyle};

/// Build a structural instruction for the generative backend.
///
/// Priority: subject line > heading > list > code block > after-salutation >
/// before-signature > document-type guidance. Returns an empty string for a
/// general document with no cursor-context flags set.
pub fn build_context_instructions(doc_type: &DocumentType, cursor: &CursorContext) -> String {
    if cursor.is_in_subject_line {
        return "Write only a concise subject line of 5-10 words. Do not write a full document."
            .to_string();
    }

    if cursor.is_in_heading {
        return "Write only a short one-line heading. No body text.".to_string();
    }

    if cursor.is_in_list {
        let style = match cursor.list_style {
            ListStyle::Numbered => "numbered",
            _ => "bulleted",
        };
        return format!(
            "Continue the {style} list with one or more brief items matching the existing style."
        );
    }

    if cursor.is_in_code_block {
        return "Write only code. No prose or explanations outside the code.".to_string();
    }

    if cursor.is_after_salutation {
        return "Write the body of the message: 2-3 paragraphs in a natural tone.".to_string();
    }

    if cursor.is_before_signature {
        return "Write a brief closing paragraph leading into the signature.".to_string();
    }

    match doc_type.kind {
        DocumentKind::Email => {
            "Write in a clear, concise email style appropriate for the context.".to_string()
        }
        DocumentKind::Letter => "Write in a formal letter tone.".to_string(),
        DocumentKind::Article => match &cursor.nearest_heading {
            Some(heading) => format!(
                "Continue the article section under the heading \"{heading}\"."
            ),
            None => "Continue the article in a consistent expository style.".to_string(),
        },
        DocumentKind::List => "Keep entries short and parallel in structure.".to_string(),
        DocumentKind::Code => "Match the style and language of the surrounding code.".to_string(),
        DocumentKind::General => String::new(),
    }
}
