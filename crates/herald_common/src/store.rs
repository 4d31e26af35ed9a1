//! Knowledge store implementation.
//!
//! SQLite-backed persistent storage for FAQ entries, flagged important
//! messages, and scheduled reminders, all partitioned by group_id.
//! Location: ~/.local/share/herald/knowledge.db unless configured otherwise.

use crate::model::{
    FaqEntry, FaqHit, ImportantMessage, Reminder, ReminderStatus, PENDING_ANSWER, SCHEMA_VERSION,
};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Normalized lookup key for a question: trimmed, trailing punctuation
/// stripped, lowercased. "What is the venue?" and "what is the venue"
/// resolve to the same entry.
pub fn question_key(question: &str) -> String {
    question
        .trim()
        .trim_end_matches(['?', '!', '.', ' '])
        .to_lowercase()
}

/// Knowledge store backed by SQLite
pub struct KnowledgeStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl KnowledgeStore {
    /// Open or create the knowledge store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        debug!("Opening knowledge store at {}", path.display());
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // WAL tolerates the daemon's concurrent readers and writers
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("Failed to enable WAL mode")?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .context("Failed to set synchronous mode")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        };

        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS knowledge (
                group_id TEXT NOT NULL,
                question TEXT NOT NULL,
                question_key TEXT NOT NULL,
                answer TEXT NOT NULL,
                frequency INTEGER NOT NULL DEFAULT 1,
                UNIQUE(group_id, question_key)
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS important_messages (
                group_id TEXT NOT NULL,
                message_id INTEGER NOT NULL,
                content TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id TEXT NOT NULL,
                message_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                remind_time TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS schema_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('version', ?)",
            params![SCHEMA_VERSION.to_string()],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_knowledge_group ON knowledge(group_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_important_group ON important_messages(group_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_reminders_status ON reminders(status)",
            [],
        )?;

        Ok(())
    }

    /// Register an FAQ entry. Upserts on (group_id, normalized question);
    /// re-registration overwrites the answer and resets frequency to 1.
    pub fn register_faq(&self, group_id: &str, question: &str, answer: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO knowledge (group_id, question, question_key, answer, frequency)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT(group_id, question_key) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                frequency = 1
            "#,
            params![group_id, question, question_key(question), answer],
        )?;
        Ok(())
    }

    /// Register a question with no answer yet. Keeps an existing entry
    /// (answered or pending) untouched; returns true if a row was inserted.
    pub fn register_pending_faq(&self, group_id: &str, question: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            r#"
            INSERT INTO knowledge (group_id, question, question_key, answer, frequency)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT(group_id, question_key) DO NOTHING
            "#,
            params![group_id, question, question_key(question), PENDING_ANSWER],
        )?;
        Ok(inserted > 0)
    }

    /// Case-insensitive exact-match lookup. A hit counts: the frequency is
    /// bumped by a single UPDATE, so concurrent hits cannot lose increments.
    /// Returns the answer and the frequency after the bump.
    pub fn lookup_faq(&self, group_id: &str, question: &str) -> Result<Option<FaqHit>> {
        let key = question_key(question);
        let conn = self.conn.lock().unwrap();

        let updated = conn.execute(
            "UPDATE knowledge SET frequency = frequency + 1
             WHERE group_id = ? AND question_key = ?",
            params![group_id, &key],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let hit = conn
            .query_row(
                "SELECT answer, frequency FROM knowledge
                 WHERE group_id = ? AND question_key = ?",
                params![group_id, &key],
                |row| {
                    Ok(FaqHit {
                        answer: row.get(0)?,
                        frequency: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(hit)
    }

    /// Fetch an FAQ entry without counting a hit.
    pub fn get_faq(&self, group_id: &str, question: &str) -> Result<Option<FaqEntry>> {
        let conn = self.conn.lock().unwrap();
        let entry = conn
            .query_row(
                "SELECT group_id, question, answer, frequency FROM knowledge
                 WHERE group_id = ? AND question_key = ?",
                params![group_id, question_key(question)],
                |row| {
                    Ok(FaqEntry {
                        group_id: row.get(0)?,
                        question: row.get(1)?,
                        answer: row.get(2)?,
                        frequency: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// Count FAQ entries for a group.
    pub fn faq_count(&self, group_id: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: usize = conn.query_row(
            "SELECT COUNT(*) FROM knowledge WHERE group_id = ?",
            params![group_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Archive a message the classifier flagged. Append-only, no dedup.
    pub fn insert_important_message(
        &self,
        group_id: &str,
        message_id: i64,
        content: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO important_messages (group_id, message_id, content) VALUES (?, ?, ?)",
            params![group_id, message_id, content],
        )?;
        Ok(())
    }

    /// Archived important messages for a group, in arrival order.
    pub fn important_messages(&self, group_id: &str) -> Result<Vec<ImportantMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT group_id, message_id, content FROM important_messages
             WHERE group_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![group_id], |row| {
            Ok(ImportantMessage {
                group_id: row.get(0)?,
                message_id: row.get(1)?,
                content: row.get(2)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Count archived important messages for a group.
    pub fn important_message_count(&self, group_id: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: usize = conn.query_row(
            "SELECT COUNT(*) FROM important_messages WHERE group_id = ?",
            params![group_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Persist a reminder; returns its id. Failures propagate to the caller
    /// so a reminder is never acknowledged without a durable row behind it.
    pub fn insert_reminder(
        &self,
        group_id: &str,
        message_id: i64,
        content: &str,
        remind_time: NaiveDateTime,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reminders (group_id, message_id, content, remind_time, status)
             VALUES (?, ?, ?, ?, ?)",
            params![
                group_id,
                message_id,
                content,
                remind_time,
                ReminderStatus::Pending.as_str()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All reminders still waiting to fire, oldest first. Startup reloads
    /// these into the scheduler; past-due rows fire immediately.
    pub fn pending_reminders(&self) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, group_id, message_id, content, remind_time, status
             FROM reminders WHERE status = ? ORDER BY remind_time ASC",
        )?;
        let rows = stmt.query_map(params![ReminderStatus::Pending.as_str()], |row| {
            Ok(Reminder {
                id: row.get(0)?,
                group_id: row.get(1)?,
                message_id: row.get(2)?,
                content: row.get(3)?,
                remind_time: row.get(4)?,
                status: ReminderStatus::parse(&row.get::<_, String>(5)?),
            })
        })?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?);
        }
        Ok(reminders)
    }

    /// Fetch a reminder by id.
    pub fn get_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let reminder = conn
            .query_row(
                "SELECT id, group_id, message_id, content, remind_time, status
                 FROM reminders WHERE id = ?",
                params![id],
                |row| {
                    Ok(Reminder {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                        message_id: row.get(2)?,
                        content: row.get(3)?,
                        remind_time: row.get(4)?,
                        status: ReminderStatus::parse(&row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;
        Ok(reminder)
    }

    /// Mark a reminder delivered so a restart does not fire it again.
    pub fn mark_reminder_delivered(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE reminders SET status = ? WHERE id = ?",
            params![ReminderStatus::Delivered.as_str(), id],
        )?;
        Ok(())
    }

    /// Cancel a pending reminder; returns false if it already fired,
    /// was already canceled, or never existed.
    pub fn cancel_reminder(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE reminders SET status = ? WHERE id = ? AND status = ?",
            params![
                ReminderStatus::Canceled.as_str(),
                id,
                ReminderStatus::Pending.as_str()
            ],
        )?;
        Ok(changed > 0)
    }

    /// Stored schema version.
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let version: String = conn.query_row(
            "SELECT value FROM schema_meta WHERE key = 'version'",
            [],
            |row| row.get(0),
        )?;
        version.parse().context("Invalid schema version")
    }

    /// Get database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}
