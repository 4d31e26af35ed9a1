//! Error types for Herald.

use thiserror::Error;

/// Failures on the reminder request path.
///
/// `Format` and `PastTime` come from input validation and are reported back
/// to the requesting user; re-entry is allowed. `Storage` is an I/O failure,
/// fatal to the triggering call and propagated to the dispatch layer.
#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Unparsable reminder time, expected YYYY-MM-DD HH:MM")]
    Format,

    #[error("Reminder time must be in the future")]
    PastTime,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
