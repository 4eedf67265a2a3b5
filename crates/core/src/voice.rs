//! Voice command session.
//!
//! Speech recognition and synthesis are platform services reached through
//! [`VoiceBackend`]. The session owns the listening state, routes recognized
//! utterances through the shared [`Assistant`], applies any resulting task
//! mutation and reports back through speech and toasts.

use crate::assistant::{Assistant, Command, Intent, Interpretation};
use crate::error::VoiceError;
use crate::notify::{deliver, Notification, NotificationSink};
use crate::services::{TaskMutation, TasksService};

pub const LISTENING: &str = "Listening for voice commands...";
pub const UNSUPPORTED: &str = "Voice commands not supported in this browser";
pub const RECOGNITION_ERROR: &str = "Voice recognition error. Please try again.";
pub const NOT_FOUND: &str = "Task not found or already completed";
pub const NOT_RECOGNIZED: &str =
    "Command not recognized. Try: \"add task\", \"list tasks\", \"complete task\", or \"show progress\"";

pub trait VoiceBackend {
    fn is_supported(&self) -> bool;
    /// Begin one single-shot recognition.
    fn start(&mut self) -> Result<(), VoiceError>;
    fn stop(&mut self);
    fn speak(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Utterance(String),
    Error(String),
    Ended,
}

pub struct VoiceSession<B> {
    backend: B,
    assistant: Assistant,
    service: TasksService,
    listening: bool,
}

impl<B: VoiceBackend> VoiceSession<B> {
    pub fn new(backend: B, assistant: Assistant, service: TasksService) -> Self {
        Self {
            backend,
            assistant,
            service,
            listening: false,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Microphone button: start when idle, stop when listening.
    pub fn toggle(&mut self, sink: &mut dyn NotificationSink) {
        if self.listening {
            self.stop();
        } else {
            self.start(sink);
        }
    }

    /// No-op while already listening. Returns whether the session is listening afterwards.
    pub fn start(&mut self, sink: &mut dyn NotificationSink) -> bool {
        if !self.backend.is_supported() {
            deliver(sink, Notification::error(UNSUPPORTED));
            return false;
        }
        if self.listening {
            return true;
        }
        match self.backend.start() {
            Ok(()) => {
                self.listening = true;
                deliver(sink, Notification::info(LISTENING));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to start recognition");
                deliver(sink, Notification::error(RECOGNITION_ERROR));
            }
        }
        self.listening
    }

    pub fn stop(&mut self) {
        if self.listening {
            self.backend.stop();
            self.listening = false;
        }
    }

    pub fn handle_event(
        &mut self,
        event: VoiceEvent,
        sink: &mut dyn NotificationSink,
    ) -> Option<Interpretation> {
        match event {
            VoiceEvent::Utterance(transcript) => {
                self.listening = false;
                Some(self.handle_utterance(&transcript, sink))
            }
            VoiceEvent::Error(reason) => {
                tracing::warn!(%reason, "speech recognition error");
                self.listening = false;
                deliver(sink, Notification::error(RECOGNITION_ERROR));
                None
            }
            VoiceEvent::Ended => {
                self.listening = false;
                None
            }
        }
    }

    fn handle_utterance(
        &mut self,
        transcript: &str,
        sink: &mut dyn NotificationSink,
    ) -> Interpretation {
        let command = transcript.trim().to_lowercase();
        let snapshot = self.service.snapshot();
        let interpretation = self.assistant.interpret(&command, &snapshot);

        if let Some(mutation) = &interpretation.mutation {
            match self.service.apply(mutation) {
                Ok(task) => {
                    let toast = match mutation {
                        TaskMutation::Add(_) => format!("Added task: {}", task.title),
                        TaskMutation::Complete(_) => format!("Completed: {}", task.title),
                    };
                    deliver(sink, Notification::success(toast));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "voice mutation rejected");
                    deliver(sink, Notification::error(NOT_FOUND));
                }
            }
        } else {
            match &interpretation.intent {
                Intent::Command(Command::CompleteTask { .. }) => {
                    deliver(sink, Notification::error(NOT_FOUND));
                }
                Intent::Unrecognized => {
                    deliver(sink, Notification::info(NOT_RECOGNIZED));
                }
                _ => {}
            }
        }

        self.backend.speak(&interpretation.response.text);
        interpretation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{Priority, Task, TaskFilter, TaskId};
    use crate::notify::{MemorySink, NotificationKind};
    use crate::random::ScriptedRandom;
    use crate::store::TaskStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Default)]
    struct ScriptedBackend {
        unsupported: bool,
        fail_start: bool,
        starts: usize,
        stops: usize,
        spoken: Vec<String>,
    }

    impl VoiceBackend for ScriptedBackend {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn start(&mut self) -> Result<(), VoiceError> {
            if self.fail_start {
                return Err(VoiceError::Recognition("not-allowed".into()));
            }
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }

        fn speak(&mut self, text: &str) {
            self.spoken.push(text.to_string());
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
    }

    fn seeded_tasks() -> Vec<Task> {
        let task = |id: u64, title: &str, completed: bool| Task {
            id: TaskId(id),
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: now() + Duration::hours(3),
            completed,
            category: "work".into(),
            recurrence: None,
        };
        vec![
            task(1, "Review project proposal", false),
            task(2, "Team meeting", false),
            task(3, "Complete workout", true),
        ]
    }

    fn session(backend: ScriptedBackend) -> (VoiceSession<ScriptedBackend>, TasksService) {
        let clock = Arc::new(ManualClock::new(now()));
        let service = TasksService::new(TaskStore::new(seeded_tasks()), clock.clone());
        let assistant = Assistant::new(clock, Box::new(ScriptedRandom::new()));
        (
            VoiceSession::new(backend, assistant, service.clone()),
            service,
        )
    }

    #[test]
    fn start_is_a_noop_while_listening_and_stop_is_idempotent() {
        let (mut session, _) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        assert!(session.start(&mut sink));
        assert!(session.start(&mut sink));
        assert_eq!(session.backend().starts, 1);
        assert_eq!(sink.titles(), vec![LISTENING]);

        session.stop();
        session.stop();
        assert_eq!(session.backend().stops, 1);
        assert!(!session.is_listening());
    }

    #[test]
    fn unsupported_platform_reports_on_use() {
        let (mut session, _) = session(ScriptedBackend {
            unsupported: true,
            ..Default::default()
        });
        let mut sink = MemorySink::new();
        session.toggle(&mut sink);
        assert!(!session.is_listening());
        assert_eq!(sink.notifications[0].kind, NotificationKind::Error);
        assert_eq!(sink.titles(), vec![UNSUPPORTED]);
    }

    #[test]
    fn failed_start_leaves_session_idle() {
        let (mut session, _) = session(ScriptedBackend {
            fail_start: true,
            ..Default::default()
        });
        let mut sink = MemorySink::new();
        assert!(!session.start(&mut sink));
        assert_eq!(sink.titles(), vec![RECOGNITION_ERROR]);
    }

    #[test]
    fn complete_command_changes_only_the_matching_task() {
        let (mut session, service) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        session.start(&mut sink);
        let before = service.list(TaskFilter::All);

        session.handle_event(
            VoiceEvent::Utterance("Complete task TEAM".into()),
            &mut sink,
        );

        let after = service.list(TaskFilter::All);
        assert!(after[1].completed);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert!(!session.is_listening());
        assert_eq!(sink.titles().last(), Some(&"Completed: Team meeting"));
        assert_eq!(
            session.backend().spoken,
            vec!["Task \"Team meeting\" has been marked as complete. Great job!"]
        );
    }

    #[test]
    fn unmatched_complete_leaves_store_untouched() {
        let (mut session, service) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        let version = service.snapshot().version();

        session.handle_event(
            VoiceEvent::Utterance("complete task workout".into()),
            &mut sink,
        );

        assert_eq!(service.snapshot().version(), version);
        assert_eq!(sink.titles(), vec![NOT_FOUND]);
        assert_eq!(
            session.backend().spoken,
            vec!["Sorry, I couldn't find that task or it's already completed."]
        );
    }

    #[test]
    fn add_command_appends_a_task() {
        let (mut session, service) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        session.handle_event(
            VoiceEvent::Utterance("add task call the bank".into()),
            &mut sink,
        );
        let tasks = service.list(TaskFilter::All);
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[3].title, "call the bank");
        assert_eq!(sink.titles(), vec!["Added task: call the bank"]);
    }

    #[test]
    fn recognition_errors_reset_listening() {
        let (mut session, _) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        session.start(&mut sink);
        assert!(session
            .handle_event(VoiceEvent::Error("network".into()), &mut sink)
            .is_none());
        assert!(!session.is_listening());
        assert_eq!(sink.titles(), vec![LISTENING, RECOGNITION_ERROR]);
    }

    #[test]
    fn unrecognized_speech_hints_at_commands() {
        let (mut session, _) = session(ScriptedBackend::default());
        let mut sink = MemorySink::new();
        let result = session
            .handle_event(VoiceEvent::Utterance("play some music".into()), &mut sink)
            .unwrap();
        assert_eq!(result.intent, Intent::Unrecognized);
        assert_eq!(sink.notifications[0].kind, NotificationKind::Info);
        assert_eq!(sink.titles(), vec![NOT_RECOGNIZED]);
    }
}
