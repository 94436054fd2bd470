//! Core structure-analysis type definitions.
//!
//! Defines [`DocumentKind`] (the six inferred document categories),
//! [`DocumentType`] (a classification with confidence and indicators),
//! [`ListStyle`], and [`CursorContext`] (the structural position of the
//! edit cursor).

use serde::{Deserialize, Serialize};

/// The six document categories the classifier can infer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Header lines (`Subject:`, `To:`) or embedded addresses.
    Email,
    /// Opening salutation paired with a closing valediction.
    Letter,
    /// Markdown headings or ALL-CAPS section titles.
    Article,
    /// Bullet glyphs or numbered prefixes on most lines.
    List,
    /// Fenced code blocks or language keywords.
    Code,
    /// No specific structural pattern detected.
    General,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Letter => "letter",
            Self::Article => "article",
            Self::List => "list",
            Self::Code => "code",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "letter" => Ok(Self::Letter),
            "article" => Ok(Self::Article),
            "list" => Ok(Self::List),
            "code" => Ok(Self::Code),
            "general" => Ok(Self::General),
            _ => Err(format!("unknown document kind: {s}")),
        }
    }
}

/// Result of document classification. Produced fresh per call, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentType {
    pub kind: DocumentKind,
    /// Classifier confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Human-readable signals that led to this classification, in the order
    /// they were found.
    pub indicators: Vec<String>,
}

/// Which list marker style the cursor's line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    None,
    Bullet,
    Numbered,
}

/// Structural classification of the text surrounding the edit position.
///
/// The boolean sub-checks are independent; several may be true at once
/// (a list item can also be indented, for example).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorContext {
    pub is_in_subject_line: bool,
    pub is_in_heading: bool,
    pub is_in_list: bool,
    pub is_in_code_block: bool,
    pub is_after_salutation: bool,
    pub is_before_signature: bool,
    pub list_style: ListStyle,
    /// Count of leading whitespace characters on the cursor's line.
    pub indent_level: usize,
    /// Text of the closest heading line before the cursor, if any.
    pub nearest_heading: Option<String>,
}

impl Default for CursorContext {
    fn default() -> Self {
        Self {
            is_in_subject_line: false,
            is_in_heading: false,
            is_in_list: false,
            is_in_code_block: false,
            is_after_salutation: false,
            is_before_signature: false,
            list_style: ListStyle::None,
            indent_level: 0,
            nearest_heading: None,
        }
    }
}
