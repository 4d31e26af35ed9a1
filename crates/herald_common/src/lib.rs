//! Shared library for the Herald group-chat assistant.
//!
//! Data model, configuration, error taxonomy, the SQLite-backed knowledge
//! store, and the in-memory per-group context buffer. The daemon crate
//! (`heraldd`) builds the services on top of these.

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod store;

pub use config::HeraldConfig;
pub use context::GroupContext;
pub use error::ReminderError;
pub use model::{FaqEntry, FaqHit, ImportantMessage, Reminder, ReminderStatus, PENDING_ANSWER};
pub use store::KnowledgeStore;
