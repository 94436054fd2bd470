//! Document type classification.
//!
//! [`detect_document_type`] applies ordered heuristic checks and returns the
//! first matching category. It is a total function: it never fails and always
//! returns a non-empty kind.

use super::patterns::{
    is_caps_heading, is_fence, BULLET_ITEM, CODE_KEYWORDS, EMAIL_ADDRESS, EMAIL_HEADER,
    MD_HEADING, NUMBERED_ITEM, SALUTATION, VALEDICTION,
};
use super::types::{DocumentKind, DocumentType};

/// Classify a document by its structural markers.
///
/// Categories are checked in priority order (email > letter > article > list
/// > code) and the first match wins. Unrecognized text classifies as
/// [`DocumentKind::General`] with confidence 1.0.
pub fn detect_document_type(text: &str) -> DocumentType {
    let checks: [fn(&str) -> Option<DocumentType>; 5] = [
        check_email,
        check_letter,
        check_article,
        check_list,
        check_code,
    ];

    for check in checks {
        if let Some(doc_type) = check(text) {
            return doc_type;
        }
    }

    DocumentType {
        kind: DocumentKind::General,
        confidence: 1.0,
        indicators: vec!["no specific patterns detected".to_string()],
    }
}

/// Confidence grows with the number of independent signals, capped below 1.0.
fn confidence_for(indicators: &[String]) -> f64 {
    (0.5 + 0.2 * indicators.len() as f64).min(0.95)
}

fn check_email(text: &str) -> Option<DocumentType> {
    let mut indicators = Vec::new();

    let header_lines = text
        .lines()
        .take(10)
        .filter(|line| EMAIL_HEADER.is_match(line))
        .count();
    if header_lines > 0 {
        indicators.push(format!("email header lines ({header_lines})"));
    }
    if EMAIL_ADDRESS.is_match(text) {
        indicators.push("embedded email address".to_string());
    }

    if indicators.is_empty() {
        return None;
    }

    // An address alone is weak evidence; it still classifies as email but
    // at floor confidence, so callers can discount it
    let confidence = if header_lines == 0 {
        0.5
    } else {
        confidence_for(&indicators)
    };

    Some(DocumentType {
        kind: DocumentKind::Email,
        confidence,
        indicators,
    })
}

fn check_letter(text: &str) -> Option<DocumentType> {
    let mut indicators = Vec::new();

    let has_salutation = text.lines().take(5).any(|line| SALUTATION.is_match(line.trim()));
    let has_valediction = text.lines().rev().take(8).any(|line| VALEDICTION.is_match(line.trim()));

    if has_salutation {
        indicators.push("opening salutation".to_string());
    }
    if has_valediction {
        indicators.push("closing valediction".to_string());
    }

    // Letters need both ends to be present
    if !(has_salutation && has_valediction) {
        return None;
    }

    Some(DocumentType {
        kind: DocumentKind::Letter,
        confidence: confidence_for(&indicators),
        indicators,
    })
}

fn check_article(text: &str) -> Option<DocumentType> {
    let mut indicators = Vec::new();

    let md_headings = text.lines().filter(|line| MD_HEADING.is_match(line)).count();
    if md_headings > 0 {
        indicators.push(format!("markdown headings ({md_headings})"));
    }

    let caps_headings = text.lines().filter(|line| is_caps_heading(line)).count();
    if caps_headings > 0 {
        indicators.push(format!("upper-case heading lines ({caps_headings})"));
    }

    if indicators.is_empty() {
        return None;
    }

    Some(DocumentType {
        kind: DocumentKind::Article,
        confidence: confidence_for(&indicators),
        indicators,
    })
}

fn check_list(text: &str) -> Option<DocumentType> {
    let non_empty: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if non_empty.is_empty() {
        return None;
    }

    let bullet_count = non_empty.iter().filter(|l| BULLET_ITEM.is_match(l)).count();
    let numbered_count = non_empty.iter().filter(|l| NUMBERED_ITEM.is_match(l)).count();
    let list_lines = bullet_count + numbered_count;

    // At least half the non-empty lines must be list items
    if list_lines * 2 < non_empty.len() || list_lines < 2 {
        return None;
    }

    let mut indicators = Vec::new();
    if bullet_count > 0 {
        indicators.push(format!("bullet items ({bullet_count})"));
    }
    if numbered_count > 0 {
        indicators.push(format!("numbered items ({numbered_count})"));
    }

    Some(DocumentType {
        kind: DocumentKind::List,
        confidence: confidence_for(&indicators),
        indicators,
    })
}

fn check_code(text: &str) -> Option<DocumentType> {
    let mut indicators = Vec::new();

    let fence_count = text.lines().filter(|line| is_fence(line)).count();
    if fence_count >= 2 {
        indicators.push(format!("fenced code blocks ({})", fence_count / 2));
    }

    let keyword_lines = CODE_KEYWORDS.find_iter(text).count();
    if keyword_lines >= 3 {
        indicators.push(format!("language keyword lines ({keyword_lines})"));
    }

    if indicators.is_empty() {
        return None;
    }

    Some(DocumentType {
        kind: DocumentKind::Code,
        confidence: confidence_for(&indicators),
        indicators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_email_from_headers() {
        let doc = detect_document_type("Subject: Meeting Tomorrow\nTo: a@b.com\n\nHi,\nLet's sync at 10.");
        assert_eq!(doc.kind, DocumentKind::Email);
        assert!(doc.indicators.iter().any(|i| i.contains("header")));
        assert!(doc.confidence > 0.5);
    }

    #[test]
    fn address_alone_is_weak_email_evidence() {
        let doc = detect_document_type("Reach me at someone@example.com whenever.");
        assert_eq!(doc.kind, DocumentKind::Email);
        assert_eq!(doc.confidence, 0.5);

        let with_headers = detect_document_type("To: someone@example.com\nSubject: hello\n\nHi,");
        assert!(with_headers.confidence > doc.confidence);
    }

    #[test]
    fn detects_letter() {
        let doc = detect_document_type(
            "Dear Ms. Lee,\n\nThank you for the opportunity to interview last week.\n\nSincerely,\nAlex",
        );
        assert_eq!(doc.kind, DocumentKind::Letter);
        assert!(doc.indicators.iter().any(|i| i.contains("salutation")));
        assert!(doc.indicators.iter().any(|i| i.contains("valediction")));
    }

    #[test]
    fn salutation_without_closing_is_not_a_letter() {
        let doc = detect_document_type("Hi team,\n\nA quick note about the release.");
        assert_ne!(doc.kind, DocumentKind::Letter);
    }

    #[test]
    fn detects_article_from_markdown_headings() {
        let doc = detect_document_type("# Introduction\n\nSome prose.\n\n## Background\n\nMore prose.");
        assert_eq!(doc.kind, DocumentKind::Article);
    }

    #[test]
    fn detects_article_from_caps_headings() {
        let doc = detect_document_type("EXECUTIVE SUMMARY\n\nThe quarter went well overall.");
        assert_eq!(doc.kind, DocumentKind::Article);
    }

    #[test]
    fn detects_list() {
        let doc = detect_document_type("- milk\n- eggs\n- flour\n- coffee beans");
        assert_eq!(doc.kind, DocumentKind::List);
    }

    #[test]
    fn detects_numbered_list() {
        let doc = detect_document_type("1. boil the water\n2. grind the beans\n3. pour slowly");
        assert_eq!(doc.kind, DocumentKind::List);
    }

    #[test]
    fn detects_code() {
        let doc = detect_document_type(
            "fn main() {\n    let x = 1;\n    let y = 2;\n    return x + y;\n}",
        );
        assert_eq!(doc.kind, DocumentKind::Code);
    }

    #[test]
    fn email_wins_over_article() {
        // Has both email headers and markdown headings; email has priority
        let doc = detect_document_type("Subject: Weekly digest\nFrom: news@example.com\n\n# Top story\n\nDetails.");
        assert_eq!(doc.kind, DocumentKind::Email);
    }

    #[test]
    fn unstructured_text_is_general() {
        let doc = detect_document_type("just some plain thoughts written down quickly");
        assert_eq!(doc.kind, DocumentKind::General);
        assert_eq!(doc.confidence, 1.0);
        assert!(doc.indicators[0].contains("no specific patterns"));
    }

    #[test]
    fn empty_text_is_general() {
        let doc = detect_document_type("");
        assert_eq!(doc.kind, DocumentKind::General);
    }
}
