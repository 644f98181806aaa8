//! Shared in-memory notification queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{Notification, Notifier};

/// FIFO of pending notifications. Clones share the same queue, so the widget
/// can hold one handle while the front end drains another.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            kind = ?notification.kind,
            message = %notification.message,
            "Notification queued"
        );
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(notification),
            Err(poisoned) => poisoned.into_inner().push_back(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_queue() {
        let queue = NotificationQueue::new();
        let handle = queue.clone();

        handle.notify(Notification::success("one"));
        handle.notify(Notification::failure("two"));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert_eq!(drained[1].message, "two");
        assert!(handle.is_empty());
    }

    #[test]
    fn test_drain_empty_queue() {
        let queue = NotificationQueue::new();
        assert!(queue.drain().is_empty());
    }
}
