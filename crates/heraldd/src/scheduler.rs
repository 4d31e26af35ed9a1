//! Reminder scheduler.
//!
//! One-shot delay tasks over durable reminder rows. Every scheduled entry
//! keeps its `JoinHandle` keyed by reminder id so it can be canceled, and
//! startup re-hydrates pending rows from the store, so a restart only delays
//! delivery instead of dropping it. Past-due rows fire immediately.

use anyhow::Result;
use chrono::Local;
use herald_common::{KnowledgeStore, Reminder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::notify::Notifier;

pub struct ReminderScheduler {
    store: Arc<KnowledgeStore>,
    notifier: Arc<dyn Notifier>,
    tasks: Arc<Mutex<HashMap<i64, JoinHandle<()>>>>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<KnowledgeStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arrange one-shot delivery for a persisted reminder.
    pub async fn schedule(&self, reminder: Reminder) {
        let delay = (reminder.remind_time - Local::now().naive_local())
            .to_std()
            .unwrap_or(Duration::ZERO);

        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let tasks = Arc::clone(&self.tasks);
        let id = reminder.id;

        // Holding the map lock across the spawn keeps the task from
        // removing its entry before it was inserted.
        let mut guard = self.tasks.lock().await;
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            notifier.notify(
                &reminder.group_id,
                &format!("⏰ Reminder: {}", reminder.content),
            );
            if let Err(e) = store.mark_reminder_delivered(reminder.id) {
                // Delivery already happened; the row stays pending and will
                // fire again after a restart.
                error!(id = reminder.id, "Failed to mark reminder delivered: {e:#}");
            }
            tasks.lock().await.remove(&reminder.id);
            info!(id = reminder.id, group_id = %reminder.group_id, "Reminder delivered");
        });
        guard.insert(id, handle);
    }

    /// Cancel a reminder by id: aborts the delay task if one is running and
    /// marks the row canceled. Returns false if it already fired, was
    /// already canceled, or never existed.
    pub async fn cancel(&self, id: i64) -> Result<bool> {
        if let Some(handle) = self.tasks.lock().await.remove(&id) {
            handle.abort();
        }
        let canceled = self.store.cancel_reminder(id)?;
        if canceled {
            info!(id, "Reminder canceled");
        } else {
            warn!(id, "Cancel requested for a reminder that is not pending");
        }
        Ok(canceled)
    }

    /// Reload pending rows from the store and schedule them. Called once at
    /// startup; returns how many reminders were rescheduled.
    pub async fn rehydrate(&self) -> Result<usize> {
        let pending = self.store.pending_reminders()?;
        let count = pending.len();
        for reminder in pending {
            self.schedule(reminder).await;
        }
        if count > 0 {
            info!("Rescheduled {count} pending reminder(s)");
        }
        Ok(count)
    }

    /// Number of delay tasks currently scheduled.
    pub async fn scheduled_count(&self) -> usize {
        self.tasks.lock().await.len()
    }
}
