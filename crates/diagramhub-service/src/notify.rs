//! Transient user-facing notifications.
//!
//! Mutation failures surface after the triggering call has returned, so
//! they are published here instead of being returned as errors.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something the user asked for did not happen.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Human-readable text.
    pub message: String,
}

/// Broadcasts notifications to any number of subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a notifier that buffers up to `capacity` messages per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publish an error notification.
    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Error, message.into());
    }

    /// Publish an informational notification.
    pub fn info(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Info, message.into());
    }

    fn publish(&self, level: NotificationLevel, message: String) {
        debug!(?level, %message, "Notification");
        // No subscribers is fine.
        let _ = self.tx.send(Notification { level, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
