//! Cursor position analysis.
//!
//! [`analyze_cursor_context`] classifies the structural position of an edit
//! cursor: subject line, heading, list item, open code fence, and the
//! salutation/signature neighborhood. Total function — any input yields a
//! well-formed [`CursorContext`].

use super::patterns::{
    is_caps_heading, is_fence, BULLET_ITEM, EMAIL_HEADER, MD_HEADING, NUMBERED_ITEM, SALUTATION,
    VALEDICTION,
};
use super::types::{CursorContext, ListStyle};

/// How many lines after the cursor to scan for a closing valediction.
const SIGNATURE_LOOKAHEAD_LINES: usize = 5;

/// Analyze the structural context of `cursor_pos` within `text`.
///
/// `cursor_pos` is a byte offset; it is clamped to the document bounds and
/// snapped back to the nearest character boundary.
pub fn analyze_cursor_context(text: &str, cursor_pos: usize) -> CursorContext {
    if text.is_empty() {
        return CursorContext::default();
    }

    let pos = clamp_to_char_boundary(text, cursor_pos);
    let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    let line = &text[line_start..line_end];
    let before = &text[..line_start];

    let is_in_subject_line = EMAIL_HEADER.is_match(line) || follows_header_block(before);
    let is_in_heading = MD_HEADING.is_match(line) || is_caps_heading(line);

    let (is_in_list, list_style) = if BULLET_ITEM.is_match(line) {
        (true, ListStyle::Bullet)
    } else if NUMBERED_ITEM.is_match(line) {
        (true, ListStyle::Numbered)
    } else {
        (false, ListStyle::None)
    };

    // An odd number of fence delimiters before the cursor's line means the
    // cursor sits inside an open fence.
    let fences_before = before.lines().filter(|l| is_fence(l)).count();
    let is_in_code_block = fences_before % 2 == 1;

    let is_after_salutation = before
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|l| SALUTATION.is_match(l.trim()))
        .unwrap_or(false);

    let is_before_signature = text[line_end..]
        .lines()
        .take(SIGNATURE_LOOKAHEAD_LINES)
        .any(|l| VALEDICTION.is_match(l.trim()));

    let indent_level = line.chars().take_while(|c| c.is_whitespace()).count();

    CursorContext {
        is_in_subject_line,
        is_in_heading,
        is_in_list,
        is_in_code_block,
        is_after_salutation,
        is_before_signature,
        list_style,
        indent_level,
        nearest_heading: nearest_heading(before),
    }
}

/// Snap a byte offset to the nearest valid char boundary at or below it.
pub(crate) fn clamp_to_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// True when the last line before the cursor's line is an email header —
/// the cursor then sits on the line immediately following a header block.
fn follows_header_block(before: &str) -> bool {
    before
        .lines()
        .next_back()
        .map(|l| EMAIL_HEADER.is_match(l))
        .unwrap_or(false)
}

/// Scan backward from the cursor for the closest heading line.
fn nearest_heading(before: &str) -> Option<String> {
    for line in before.lines().rev() {
        if let Some(caps) = MD_HEADING.captures(line) {
            return Some(caps[2].trim().to_string());
        }
        if is_caps_heading(line) {
            return Some(line.trim().to_string());
        }
    }
    None
}
