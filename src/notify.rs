//! Operation notifications
//!
//! Sinks are told how each create, rename, delete, write and save ended.
//! They only observe; nothing they do feeds back into the session.

use owo_colors::OwoColorize;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Write,
    Rename,
    Delete,
    Save,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Write => "write",
            Operation::Rename => "rename",
            Operation::Delete => "delete",
            Operation::Save => "save",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub operation: Operation,
    pub success: bool,
    pub message: String,
}

impl Notification {
    pub fn success(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            success: false,
            message: message.into(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Forwards notifications to the `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        if notification.success {
            tracing::info!(operation = %notification.operation, "{}", notification.message);
        } else {
            tracing::warn!(operation = %notification.operation, "{}", notification.message);
        }
    }
}

/// Keeps every notification; handy for embedding and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received.lock().last().cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) {
        self.received.lock().push(notification.clone());
    }
}

/// Prints notifications to stderr, green for success and red for failure
#[derive(Debug, Default)]
pub struct ConsoleSink {
    pub color: bool,
}

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: &Notification) {
        let label = if notification.success { "ok" } else { "failed" };
        let label = match (self.color, notification.success) {
            (false, _) => label.to_string(),
            (true, true) => label.green().bold().to_string(),
            (true, false) => label.red().bold().to_string(),
        };
        eprintln!("[{} {}] {}", notification.operation, label, notification.message);
    }
}
