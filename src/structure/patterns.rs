//! Compiled patterns shared by the structure analyzers.

use regex::Regex;
use std::sync::LazyLock;

/// Email header lines such as `Subject:`, `To:`, `From:`.
pub(crate) static EMAIL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(subject|to|from|cc|bcc|date):\s*").expect("valid regex"));

/// A bare email address anywhere in the text.
pub(crate) static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex"));

/// Opening salutations: `Dear Ms. Lee,`, `Hi team,`, `Hello,`.
pub(crate) static SALUTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(dear|hi|hello|hey|greetings)\b[^\n]{0,60}[,:]?\s*$").expect("valid regex")
});

/// Closing valedictions: `Sincerely,`, `Best regards,`, `Thanks,`.
pub(crate) static VALEDICTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(sincerely|regards|best regards|kind regards|warm regards|best wishes|best|cheers|thanks|thank you|yours truly|yours sincerely|respectfully)[,.!]?\s*$",
    )
    .expect("valid regex")
});

/// Markdown heading prefix (`#` through `######`).
pub(crate) static MD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid regex"));

/// Bullet list item: `- `, `* `, `+ `, or a bullet glyph.
pub(crate) static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([-*+\u{2022}\u{2023}\u{25E6}])\s+").expect("valid regex"));

/// Numbered list item: `1. ` or `1) `.
pub(crate) static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{1,3}[.)]\s+").expect("valid regex"));

/// A handful of keywords that strongly suggest source code.
pub(crate) static CODE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(fn|pub fn|def|class|function|import|use|let|const|var|return|if|for|while)\b",
    )
    .expect("valid regex")
});

/// True if a line is entirely upper-case text with at least one letter,
/// short enough to plausibly be a heading.
pub(crate) fn is_caps_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() > 80 {
        return false;
    }
    let has_alpha = trimmed.chars().any(|c| c.is_alphabetic());
    has_alpha && !trimmed.chars().any(|c| c.is_lowercase())
}

/// True if a line opens or closes a fenced code block.
pub(crate) fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}
