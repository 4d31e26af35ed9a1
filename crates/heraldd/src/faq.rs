//! FAQ service.
//!
//! Lookup-or-register-pending orchestration over the knowledge store.

use anyhow::Result;
use herald_common::KnowledgeStore;
use std::sync::Arc;
use tracing::{debug, info};

pub struct FaqService {
    store: Arc<KnowledgeStore>,
}

impl FaqService {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self { store }
    }

    /// Answer a question from the group's knowledge base. A hit counts
    /// toward the entry's frequency. A miss registers the question as a
    /// pending entry and returns None so the dispatch layer can ask the
    /// user to clarify. Every unanswered question becomes a pending row;
    /// there is no cap, cleanup, or fuzzy merging of near-duplicates.
    pub fn handle_question(&self, group_id: &str, question: &str) -> Result<Option<String>> {
        debug!(group_id, question, "FAQ lookup");
        if let Some(hit) = self.store.lookup_faq(group_id, question)? {
            debug!(group_id, frequency = hit.frequency, "FAQ hit");
            return Ok(Some(hit.answer));
        }

        if self.store.register_pending_faq(group_id, question)? {
            info!(group_id, question, "Registered pending FAQ");
        }
        Ok(None)
    }

    /// Admin registration: direct upsert, frequency fixed at 1.
    pub fn register(&self, group_id: &str, question: &str, answer: &str) -> Result<()> {
        self.store.register_faq(group_id, question, answer)?;
        info!(group_id, question, "FAQ registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_common::PENDING_ANSWER;
    use tempfile::tempdir;

    fn test_service() -> (FaqService, Arc<KnowledgeStore>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(KnowledgeStore::open(&dir.path().join("test.db")).unwrap());
        (FaqService::new(Arc::clone(&store)), store, dir)
    }

    #[test]
    fn hit_returns_answer_and_counts() {
        let (service, store, _dir) = test_service();
        service.register("42", "what is the venue", "Building 5").unwrap();

        let answer = service.handle_question("42", "What is the venue?").unwrap();
        assert_eq!(answer.as_deref(), Some("Building 5"));

        let entry = store.get_faq("42", "what is the venue").unwrap().unwrap();
        assert_eq!(entry.frequency, 2);
    }

    #[test]
    fn miss_registers_exactly_one_pending_row() {
        let (service, store, _dir) = test_service();

        let answer = service.handle_question("42", "where is lunch?").unwrap();
        assert!(answer.is_none());

        assert_eq!(store.faq_count("42").unwrap(), 1);
        let entry = store.get_faq("42", "where is lunch").unwrap().unwrap();
        assert_eq!(entry.answer, PENDING_ANSWER);
        assert_eq!(entry.frequency, 1);
    }

    #[test]
    fn repeated_miss_does_not_duplicate_pending_rows() {
        let (service, store, _dir) = test_service();
        service.handle_question("42", "where is lunch?").unwrap();

        // Second ask hits the pending row instead of inserting another
        let answer = service.handle_question("42", "Where is lunch?").unwrap();
        assert_eq!(answer.as_deref(), Some(PENDING_ANSWER));
        assert_eq!(store.faq_count("42").unwrap(), 1);
    }
}
