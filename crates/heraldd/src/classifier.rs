//! Relevance classifier.
//!
//! Flags messages worth archiving: keyword patterns first, then a fallback
//! on schedule-related entity labels from the external recognizer. Pure
//! function of the text and the recognizer, no state.

use crate::nlp::EntityRecognizer;
use regex::Regex;
use std::sync::LazyLock;

/// Keyword patterns that mark a message as important
static IMPORTANT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(announcement|event|reminder|urgent|critical|deadline)\b").unwrap(),
        Regex::new(r"\b(date|time|location|schedule)\b").unwrap(),
    ]
});

/// True if the text matches a keyword pattern (first match short-circuits)
/// or the recognizer finds a DATE, TIME, or EVENT entity.
pub fn is_important(text: &str, recognizer: &dyn EntityRecognizer) -> bool {
    let lowered = text.to_lowercase();
    if IMPORTANT_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
        return true;
    }
    recognizer
        .entities(text)
        .iter()
        .any(|entity| entity.label.is_schedule_related())
}
