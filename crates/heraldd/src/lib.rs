//! Herald daemon library.
//!
//! The assistant core the dispatch layer drives: relevance classification,
//! question extraction, FAQ answering, and one-shot reminder scheduling.
//! Chat transport and real NLP live outside and plug in through the traits
//! in [`nlp`] and [`notify`].

pub mod assistant;
pub mod classifier;
pub mod extract;
pub mod faq;
pub mod nlp;
pub mod notify;
pub mod reminder;
pub mod scheduler;

pub use assistant::Assistant;
pub use faq::FaqService;
pub use reminder::ReminderService;
pub use scheduler::ReminderScheduler;
