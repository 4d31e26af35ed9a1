//! Reminder service.
//!
//! Validates a reminder request, persists it, and hands it to the scheduler.
//! A request is acknowledged only after the row is durable; persistence
//! failures propagate as [`ReminderError::Storage`] instead of being
//! swallowed behind a success reply.

use chrono::{Local, NaiveDateTime};
use herald_common::{KnowledgeStore, Reminder, ReminderError, ReminderStatus};
use std::sync::Arc;
use tracing::info;

use crate::scheduler::ReminderScheduler;

/// Accepted timestamp format for reminder requests
pub const REMIND_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct ReminderService {
    store: Arc<KnowledgeStore>,
    scheduler: ReminderScheduler,
}

impl ReminderService {
    pub fn new(store: Arc<KnowledgeStore>, scheduler: ReminderScheduler) -> Self {
        Self { store, scheduler }
    }

    /// Request a one-shot reminder. The time string must parse as
    /// `YYYY-MM-DD HH:MM` and lie strictly in the future; validation
    /// failures persist nothing. On success the reminder is durable and
    /// scheduled, and its id is returned for cancellation.
    pub async fn request_reminder(
        &self,
        group_id: &str,
        message_id: i64,
        content: &str,
        time_str: &str,
    ) -> Result<i64, ReminderError> {
        let remind_time = NaiveDateTime::parse_from_str(time_str.trim(), REMIND_TIME_FORMAT)
            .map_err(|_| ReminderError::Format)?;
        if remind_time <= Local::now().naive_local() {
            return Err(ReminderError::PastTime);
        }

        let id = self
            .store
            .insert_reminder(group_id, message_id, content, remind_time)?;
        info!(id, group_id, %remind_time, "Reminder stored");

        self.scheduler
            .schedule(Reminder {
                id,
                group_id: group_id.to_string(),
                message_id,
                content: content.to_string(),
                remind_time,
                status: ReminderStatus::Pending,
            })
            .await;
        Ok(id)
    }

    /// Cancel a scheduled reminder by id.
    pub async fn cancel(&self, id: i64) -> Result<bool, ReminderError> {
        Ok(self.scheduler.cancel(id).await?)
    }

    /// Reschedule pending reminders from storage. Called once at startup.
    pub async fn rehydrate(&self) -> Result<usize, ReminderError> {
        Ok(self.scheduler.rehydrate().await?)
    }
}
