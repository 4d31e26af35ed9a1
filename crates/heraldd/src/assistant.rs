//! Assistant dispatch surface.
//!
//! The explicitly constructed service object the external dispatch layer
//! calls for every inbound message or command. Holds the services and the
//! per-group context buffer; returns the outbound replies for each event.

use anyhow::Result;
use herald_common::{GroupContext, HeraldConfig, KnowledgeStore, ReminderError};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::faq::FaqService;
use crate::nlp::{EntityRecognizer, SentenceSegmenter};
use crate::notify::Notifier;
use crate::reminder::ReminderService;
use crate::scheduler::ReminderScheduler;
use crate::{classifier, extract};

const GREETING: &str = "Hi! I'm an AI messaging assistant. \
    I filter important messages, answer FAQs, and provide recommendations.";
const ADD_FAQ_USAGE: &str = "Usage: /addfaq question | answer";
const SET_REMINDER_USAGE: &str = "Usage: /setreminder message | YYYY-MM-DD HH:MM";
const SET_REMINDER_FORMAT: &str = "Invalid format. Use: /setreminder message | YYYY-MM-DD HH:MM";
const SET_REMINDER_PAST: &str = "Reminder time must be in the future.";

pub struct Assistant {
    store: Arc<KnowledgeStore>,
    faq: FaqService,
    reminders: ReminderService,
    recognizer: Arc<dyn EntityRecognizer>,
    segmenter: Arc<dyn SentenceSegmenter>,
    context: Mutex<GroupContext>,
}

impl Assistant {
    pub fn new(
        store: Arc<KnowledgeStore>,
        config: &HeraldConfig,
        recognizer: Arc<dyn EntityRecognizer>,
        segmenter: Arc<dyn SentenceSegmenter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let scheduler = ReminderScheduler::new(Arc::clone(&store), notifier);
        Self {
            faq: FaqService::new(Arc::clone(&store)),
            reminders: ReminderService::new(Arc::clone(&store), scheduler),
            store,
            recognizer,
            segmenter,
            context: Mutex::new(GroupContext::new(config.context.max_messages)),
        }
    }

    /// Reply to /start.
    pub fn greeting(&self) -> &'static str {
        GREETING
    }

    /// Handle an inbound text message: archive it if important, answer an
    /// extracted question or register it as pending, and retain the text in
    /// the group context. Returns the outbound replies in order.
    pub async fn handle_message(
        &self,
        group_id: &str,
        message_id: i64,
        text: &str,
    ) -> Result<Vec<String>> {
        let mut replies = Vec::new();

        if classifier::is_important(text, self.recognizer.as_ref()) {
            self.store
                .insert_important_message(group_id, message_id, text)?;
            replies.push(format!("📢 [Important] {text}"));
        }

        if let Some(question) = extract::extract_question(text, self.segmenter.as_ref()) {
            match self.faq.handle_question(group_id, &question)? {
                Some(answer) => replies.push(format!("🤖 Auto-Answer: {answer}")),
                None => replies.push(format!(
                    "Could you clarify or provide more details about '{question}'?"
                )),
            }
        }

        self.context.lock().unwrap().push(group_id, text);
        debug!(group_id, message_id, replies = replies.len(), "Message handled");
        Ok(replies)
    }

    /// Handle /addfaq with raw arguments in the form `question | answer`.
    pub fn handle_add_faq(&self, group_id: &str, args: &str) -> Result<String> {
        let parts: Vec<&str> = args.split('|').collect();
        if parts.len() != 2 {
            return Ok(ADD_FAQ_USAGE.to_string());
        }
        let (question, answer) = (parts[0].trim(), parts[1].trim());
        if question.is_empty() || answer.is_empty() {
            return Ok(ADD_FAQ_USAGE.to_string());
        }

        self.faq.register(group_id, question, answer)?;
        Ok(format!("FAQ added: {question} -> {answer}"))
    }

    /// Handle /setreminder with raw arguments `message | YYYY-MM-DD HH:MM`.
    /// Validation failures come back as user-facing replies; storage
    /// failures propagate so the dispatch layer never acks a reminder that
    /// was not persisted.
    pub async fn handle_set_reminder(
        &self,
        group_id: &str,
        message_id: i64,
        args: &str,
    ) -> Result<String> {
        let parts: Vec<&str> = args.split('|').collect();
        if parts.len() != 2 {
            return Ok(SET_REMINDER_USAGE.to_string());
        }
        let (content, time_str) = (parts[0].trim(), parts[1].trim());

        match self
            .reminders
            .request_reminder(group_id, message_id, content, time_str)
            .await
        {
            Ok(_id) => Ok(format!("Reminder set for '{content}' at {time_str}")),
            Err(ReminderError::Format) => Ok(SET_REMINDER_FORMAT.to_string()),
            Err(ReminderError::PastTime) => Ok(SET_REMINDER_PAST.to_string()),
            Err(ReminderError::Storage(e)) => Err(e),
        }
    }

    /// Cancel a scheduled reminder by id.
    pub async fn cancel_reminder(&self, id: i64) -> Result<bool> {
        match self.reminders.cancel(id).await {
            Ok(canceled) => Ok(canceled),
            Err(ReminderError::Storage(e)) => Err(e),
            Err(e) => Err(anyhow::Error::new(e)),
        }
    }

    /// Reschedule pending reminders from storage. Call once at startup.
    pub async fn rehydrate(&self) -> Result<usize> {
        match self.reminders.rehydrate().await {
            Ok(count) => Ok(count),
            Err(ReminderError::Storage(e)) => Err(e),
            Err(e) => Err(anyhow::Error::new(e)),
        }
    }

    /// Recent message texts retained for a group, oldest first.
    pub fn recent_context(&self, group_id: &str) -> Vec<String> {
        self.context
            .lock()
            .unwrap()
            .recent(group_id)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
