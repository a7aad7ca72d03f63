//! Transient notification slot
//!
//! Holds at most one message. A new message replaces the old one; the user
//! may dismiss it early, otherwise the orchestrator expires it after a fixed
//! duration.

use tokio::time::Instant;

/// Shown when a cycle settles with a translation
pub const TRANSLATION_COMPLETE: &str = "Translation complete!";

/// Shown when a cycle settles with a failure of any kind
pub const TRANSLATION_FAILED: &str = "Translation failed. Please try again.";

/// A message currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifies this message so a stale auto-dismiss timer cannot clear a newer one
    pub id: u64,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSlot {
    current: Option<Notification>,
    next_id: u64,
}

impl NotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing with `message`, returning its id
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.current = Some(Notification {
            id: self.next_id,
            message: message.into(),
            shown_at: Instant::now(),
        });
        self.next_id
    }

    /// Clear the slot; returns the id of the dismissed message, if any
    pub fn dismiss(&mut self) -> Option<u64> {
        self.current.take().map(|n| n.id)
    }

    /// Clear the slot only if `id` is still the message showing
    pub fn expire(&mut self, id: u64) -> bool {
        match &self.current {
            Some(n) if n.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}
