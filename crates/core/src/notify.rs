//! Toast-style notifications and the sink they are delivered through.

use std::fmt;

use crate::error::SinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Error,
    Success,
    Plain,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Error => "error",
            NotificationKind::Success => "success",
            NotificationKind::Plain => "plain",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub action_label: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: None,
            action_label: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title)
    }

    pub fn plain(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Plain, title)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }
}

/// Where notifications go. Rendering is up to the implementor.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification) -> Result<(), SinkError>;
}

/// Deliver and swallow failures. Notifications are never retried.
pub fn deliver(sink: &mut dyn NotificationSink, notification: Notification) -> bool {
    let title = notification.title.clone();
    match sink.notify(notification) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%title, error = %err, "dropping notification");
            false
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub notifications: Vec<Notification>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.notifications.iter().map(|n| n.title.as_str()).collect()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, notification: Notification) -> Result<(), SinkError> {
        self.notifications.push(notification);
        Ok(())
    }
}
