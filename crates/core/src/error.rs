use std::io;

use thiserror::Error;

use crate::model::TaskId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("No task with id {0}")]
    UnknownTask(TaskId),
    #[error("Unknown priority '{0}': expected high|medium|low")]
    UnknownPriority(String),
    #[error("Unknown recurrence '{0}': expected daily|weekly|monthly|yearly")]
    UnknownRecurrence(String),
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to access preferences at {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode preferences")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// Raised by a notification sink that cannot deliver right now. The event is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("notification sink unavailable: {0}")]
pub struct SinkError(pub String);
