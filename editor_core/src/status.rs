//! Timed status message shown on the message bar.

use std::time::{Duration, Instant};

/// A message plus the time it was set.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    created_at: Instant,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl StatusMessage {
    /// Creates a message stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the message is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns whether the message is older than `timeout` at `now`.
    pub fn is_expired_at(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= timeout
    }

    /// Returns the text while it is still within `timeout`.
    pub fn visible_text(&self, timeout: Duration) -> Option<&str> {
        if self.is_empty() || self.is_expired_at(Instant::now(), timeout) {
            None
        } else {
            Some(&self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_message_is_visible() {
        let msg = StatusMessage::new("hello");
        assert_eq!(msg.visible_text(Duration::from_secs(5)), Some("hello"));
    }

    #[test]
    fn test_expiry() {
        let msg = StatusMessage::new("hello");
        let later = Instant::now() + Duration::from_secs(6);
        assert!(msg.is_expired_at(later, Duration::from_secs(5)));
        assert!(!msg.is_expired_at(msg.created_at, Duration::from_secs(5)));
        assert_eq!(msg.visible_text(Duration::ZERO), None);
    }

    #[test]
    fn test_empty_message_is_hidden() {
        assert_eq!(StatusMessage::default().visible_text(Duration::from_secs(5)), None);
    }
}
