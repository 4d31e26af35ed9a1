//! External NLP collaborator traits.
//!
//! The classifier and extractor consume entity labels and segmented
//! sentences from whatever recognizer the deployment provides. A built-in
//! heuristic implementation keeps the daemon usable standalone; it splits on
//! sentence punctuation and treats lowercased surface tokens as lemmas,
//! and it recognizes no entities.

/// Entity labels the core consumes. Anything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Date,
    Time,
    Event,
    Other,
}

impl EntityLabel {
    pub fn parse(label: &str) -> Self {
        match label {
            "DATE" => EntityLabel::Date,
            "TIME" => EntityLabel::Time,
            "EVENT" => EntityLabel::Event,
            _ => EntityLabel::Other,
        }
    }

    /// True for the labels that mark a message as important.
    pub fn is_schedule_related(&self) -> bool {
        matches!(self, EntityLabel::Date | EntityLabel::Time | EntityLabel::Event)
    }
}

/// A labeled span from the recognizer.
#[derive(Debug, Clone)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

/// A segmented sentence with per-token lemmas.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub text: String,
    pub lemmas: Vec<String>,
}

/// Named-entity recognizer supplied by the deployment.
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Vec<Entity>;
}

/// Sentence segmenter + lemmatizer supplied by the deployment.
pub trait SentenceSegmenter: Send + Sync {
    /// Ordered sentences of the text.
    fn sentences(&self, text: &str) -> Vec<Sentence>;
}

/// Fallback NLP used when no external recognizer is wired in.
#[derive(Debug, Default)]
pub struct HeuristicNlp;

impl HeuristicNlp {
    fn lemmas(sentence: &str) -> Vec<String> {
        sentence
            .split_whitespace()
            .map(|token| {
                token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|lemma| !lemma.is_empty())
            .collect()
    }
}

impl EntityRecognizer for HeuristicNlp {
    fn entities(&self, _text: &str) -> Vec<Entity> {
        Vec::new()
    }
}

impl SentenceSegmenter for HeuristicNlp {
    fn sentences(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        for c in text.chars() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(Sentence {
                        text: trimmed.to_string(),
                        lemmas: Self::lemmas(trimmed),
                    });
                }
                current.clear();
            }
        }
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            sentences.push(Sentence {
                text: trimmed.to_string(),
                lemmas: Self::lemmas(trimmed),
            });
        }
        sentences
    }
}
