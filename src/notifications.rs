//! Process-wide list of user-facing errors and notices.
//!
//! Newest first, at most [`MAX_NOTIFICATIONS`] entries; pushing onto a full
//! list drops the oldest.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Shared handle; clones see the same list.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        };
        let id = notification.id;
        log::debug!("notification {:?}: {}", level, notification.message);

        let mut entries = self.entries.lock();
        entries.insert(0, notification);
        entries.truncate(MAX_NOTIFICATIONS);
        id
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Warning, message)
    }

    /// Returns false if no entry had that id.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn list(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_capped() {
        let notifications = Notifications::new();
        for i in 0..7 {
            notifications.error(format!("error {i}"));
        }
        let list = notifications.list();
        assert_eq!(list.len(), MAX_NOTIFICATIONS);
        assert_eq!(list[0].message, "error 6");
        assert_eq!(list[4].message, "error 2");
    }

    #[test]
    fn test_remove_and_clear() {
        let notifications = Notifications::new();
        let keep = notifications.warning("keep");
        let gone = notifications.error("gone");

        assert!(notifications.remove(gone));
        assert!(!notifications.remove(gone));
        assert_eq!(notifications.list()[0].id, keep);
        assert_eq!(notifications.list()[0].level, NotificationLevel::Warning);

        notifications.clear();
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_clones_share_the_list() {
        let a = Notifications::new();
        let b = a.clone();
        a.push(NotificationLevel::Info, "hello");
        assert_eq!(b.len(), 1);
    }
}
