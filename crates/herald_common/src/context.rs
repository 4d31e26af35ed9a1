//! In-memory per-group context buffer.
//!
//! Retains the most recent message texts for each group, bounded per group.
//! Memory only, lost on restart. Nothing reads it yet; it exists so future
//! context-aware answering has history to draw on.

use std::collections::{HashMap, VecDeque};

/// Bounded ring buffer of recent message texts, keyed by group_id.
#[derive(Debug)]
pub struct GroupContext {
    groups: HashMap<String, VecDeque<String>>,
    capacity: usize,
}

impl GroupContext {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: HashMap::new(),
            capacity,
        }
    }

    /// Append a message text, evicting the oldest when the group is full.
    pub fn push(&mut self, group_id: &str, text: &str) {
        let buffer = self.groups.entry(group_id.to_string()).or_default();
        buffer.push_back(text.to_string());
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }

    /// Recent texts for a group, oldest first.
    pub fn recent(&self, group_id: &str) -> Vec<&str> {
        self.groups
            .get(group_id)
            .map(|buffer| buffer.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, group_id: &str) -> usize {
        self.groups.get(group_id).map(VecDeque::len).unwrap_or(0)
    }

    pub fn is_empty(&self, group_id: &str) -> bool {
        self.len(group_id) == 0
    }
}
