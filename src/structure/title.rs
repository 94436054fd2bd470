//! Smart title extraction.
//!
//! [`generate_smart_title`] derives a short display title from raw document
//! text: subject line first, then headings, then the first meaningful line.

use super::patterns::{is_caps_heading, BULLET_ITEM, MD_HEADING, NUMBERED_ITEM, SALUTATION};

const MAX_TITLE_LEN: usize = 50;

/// Derive a display title from document text.
///
/// Priority order: subject-line content, heading text (markdown or caps),
/// first meaningful line, then the first 50 raw characters. Returns
/// `"Untitled"` for empty or whitespace-only input. Results longer than 50
/// characters are truncated with an ellipsis.
pub fn generate_smart_title(text: &str) -> String {
    if text.trim().is_empty() {
        return "Untitled".to_string();
    }

    if let Some(subject) = extract_subject(text) {
        return truncate_title(&subject);
    }

    if let Some(heading) = extract_heading(text) {
        return truncate_title(&heading);
    }

    if let Some(line) = first_meaningful_line(text) {
        return truncate_title(&line);
    }

    truncate_title(text.trim())
}

/// Content of the first `Subject:` line, if any.
fn extract_subject(text: &str) -> Option<String> {
    for line in text.lines().take(10) {
        if let Some(rest) = strip_prefix_ci(line, "subject:") {
            let subject = rest.trim();
            if !subject.is_empty() {
                return Some(subject.to_string());
            }
        }
    }
    None
}

/// Text of the first markdown or ALL-CAPS heading.
fn extract_heading(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(caps) = MD_HEADING.captures(line) {
            return Some(caps[2].trim().to_string());
        }
        if is_caps_heading(line) {
            return Some(line.trim().to_string());
        }
    }
    None
}

/// First non-empty line that is not a salutation and, after stripping list
/// markers, still has non-trivial length.
fn first_meaningful_line(text: &str) -> Option<String> {
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || SALUTATION.is_match(trimmed) {
            continue;
        }
        let stripped = strip_list_marker(trimmed);
        if stripped.len() > 3 {
            return Some(stripped.to_string());
        }
    }
    None
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(m) = BULLET_ITEM.find(line) {
        return line[m.end()..].trim();
    }
    if let Some(m) = NUMBERED_ITEM.find(line) {
        return line[m.end()..].trim();
    }
    line
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

fn truncate_title(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= MAX_TITLE_LEN {
        return title.to_string();
    }
    let truncated: String = title.chars().take(MAX_TITLE_LEN).collect();
    format!("{}...", truncated.trim_end())
}
