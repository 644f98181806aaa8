//! User-facing notifications for submission outcomes.
//!
//! The widget hands each notification to a [`Notifier`]. Front ends decide
//! how to surface it: the terminal UI drains a [`NotificationQueue`] into a
//! banner, the `submit` command prints it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod queue;

pub use queue::NotificationQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Failure, message)
    }

    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Receiver of notifications emitted by the widget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
