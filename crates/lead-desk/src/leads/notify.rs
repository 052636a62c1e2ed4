use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

/// Operator-facing toast payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Sink the dashboard reports outcomes to (toasts, chat hooks, logs).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Buffers notifications until a reader drains them.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().expect("notification mutex poisoned"))
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
    }
}

/// Writes notifications to the tracing subscriber; used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(title = %notification.title, "{}", notification.description),
            Severity::Destructive => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_hands_out_each_notification_once() {
        let log = NotificationLog::default();
        log.notify(Notification::success("Outreach Sent!"));
        log.notify(Notification::error("Failed to fetch leads data"));

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "Success");
        assert_eq!(drained[1].severity, Severity::Destructive);
        assert!(log.drain().is_empty());
        assert!(log.entries().is_empty());
    }
}
