//! Question extractor.
//!
//! Pulls the first question-looking sentence out of a message: either it
//! contains a literal "?" or one of its token lemmas is an interrogative.

use crate::nlp::SentenceSegmenter;

const QUESTION_LEMMAS: [&str; 5] = ["what", "how", "when", "where", "why"];

/// First sentence that reads like a question, trimmed. None if no
/// sentence qualifies.
pub fn extract_question(text: &str, segmenter: &dyn SentenceSegmenter) -> Option<String> {
    for sentence in segmenter.sentences(text) {
        let is_question = sentence.text.contains('?')
            || sentence
                .lemmas
                .iter()
                .any(|lemma| QUESTION_LEMMAS.contains(&lemma.as_str()));
        if is_question {
            return Some(sentence.text.trim().to_string());
        }
    }
    None
}
