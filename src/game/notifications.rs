use std::time::{Duration, Instant};

use crate::logger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    expires_at: Instant,
}

/// A single transient notification slot.
///
/// A new notification replaces the visible one and restarts its timer instead
/// of queueing behind it.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notification>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notify_at(text, Instant::now());
    }

    pub fn notify_at(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        logger!(INFO, "[NOTICE] {text}");
        self.current = Some(Notification {
            text,
            expires_at: now + self.ttl,
        });
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.text.as_str())
    }

    /// Drops the notification once its timer has run out. Returns `true` if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(notification) if notification.expires_at <= now => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_expires_after_ttl() {
        let start = Instant::now();
        let mut notifier = Notifier::new(Duration::from_millis(100));
        notifier.notify_at("Connection closed.", start);

        assert!(!notifier.expire(start + Duration::from_millis(50)));
        assert_eq!(notifier.current(), Some("Connection closed."));
        assert!(notifier.expire(start + Duration::from_millis(100)));
        assert_eq!(notifier.current(), None);
    }

    #[test]
    fn test_new_notification_resets_timer() {
        let start = Instant::now();
        let mut notifier = Notifier::new(Duration::from_millis(100));
        notifier.notify_at("first", start);
        notifier.notify_at("second", start + Duration::from_millis(80));

        // The first deadline has passed but the timer was reset
        assert!(!notifier.expire(start + Duration::from_millis(120)));
        assert_eq!(notifier.current(), Some("second"));
        assert!(notifier.expire(start + Duration::from_millis(180)));
    }
}
