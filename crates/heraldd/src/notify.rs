//! Outbound notification seam.
//!
//! The dispatch layer owns message delivery; the scheduler only needs a way
//! to hand it a reminder text for a group.

use tracing::info;

/// Outbound delivery supplied by the dispatch layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, group_id: &str, text: &str);
}

/// Logs outbound notifications. Used when the daemon runs without a
/// chat transport attached.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, group_id: &str, text: &str) {
        info!(group_id, "outbound: {}", text);
    }
}
