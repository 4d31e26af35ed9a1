//! Data model for the knowledge store.
//!
//! Three durable record types, all partitioned by `group_id`: FAQ entries,
//! archived important messages, and scheduled reminders.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

/// Placeholder answer stored when a question arrives with no FAQ entry yet.
/// Admins overwrite it via FAQ registration.
pub const PENDING_ANSWER: &str = "Pending admin response";

/// A stored (question, answer) pair with a lookup-hit counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Chat conversation this entry belongs to
    pub group_id: String,
    /// Question text as originally written (case preserved)
    pub question: String,
    /// Stored answer, or [`PENDING_ANSWER`] until an admin fills it in
    pub answer: String,
    /// Number of lookup hits, starts at 1
    pub frequency: i64,
}

/// Result of a successful FAQ lookup: the answer plus the frequency
/// after the hit was counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqHit {
    pub answer: String,
    pub frequency: i64,
}

/// A message the relevance classifier flagged, archived verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportantMessage {
    pub group_id: String,
    pub message_id: i64,
    pub content: String,
}

/// Reminder lifecycle in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Persisted, not yet fired; rescheduled on startup
    Pending,
    /// Notification was sent
    Delivered,
    /// Canceled before it fired
    Canceled,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Delivered => "delivered",
            ReminderStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "delivered" => ReminderStatus::Delivered,
            "canceled" => ReminderStatus::Canceled,
            _ => ReminderStatus::Pending,
        }
    }
}

/// A scheduled one-shot notification tied to a future timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Storage rowid, the handle for cancellation
    pub id: i64,
    pub group_id: String,
    /// Message that requested the reminder
    pub message_id: i64,
    pub content: String,
    /// Local wall-clock time the reminder fires at
    pub remind_time: NaiveDateTime,
    pub status: ReminderStatus,
}
