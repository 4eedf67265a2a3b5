//! Rule-based assistant shared by the chat panel and voice commands.
//!
//! An utterance is classified against one ordered pattern table
//! ([`intent::classify`]) and answered from a read-only task snapshot. The
//! chat surface only asks questions; the voice surface may also issue
//! imperative commands, which come back as a [`TaskMutation`] for the caller
//! to apply. Nothing here touches the store.

pub mod intent;
mod replies;

use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::model::{Priority, Task};
use crate::queries::{self, Progress};
use crate::random::{choose, RandomSource};
use crate::services::{next_task_id, TaskMutation};

pub use intent::{classify, Command, Intent, Query, Surface};
pub use replies::{GREETING, GREETING_SUGGESTIONS};

pub const VOICE_TASK_DESCRIPTION: &str = "Task created via voice command";
pub const VOICE_TASK_CATEGORY: &str = "work";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub suggested_follow_ups: Option<Vec<String>>,
}

impl Response {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suggested_follow_ups: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub intent: Intent,
    pub response: Response,
    pub mutation: Option<TaskMutation>,
}

pub struct Assistant {
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl Assistant {
    pub fn new(clock: Arc<dyn Clock>, random: Box<dyn RandomSource>) -> Self {
        Self { clock, random }
    }

    /// Answer a chat message. Follow-up suggestions are always attached.
    pub fn respond(&mut self, utterance: &str, tasks: &[Task]) -> Response {
        let intent = classify(utterance, Surface::Chat);
        let text = match &intent {
            Intent::Query(query) => self.answer(*query, tasks),
            Intent::Command(_) | Intent::Unrecognized => {
                choose(self.random.as_mut(), replies::CHAT_FALLBACKS).to_string()
            }
        };
        tracing::debug!(intent = intent.label(), surface = "chat", "utterance classified");
        Response {
            text,
            suggested_follow_ups: Some(
                replies::CHAT_FOLLOW_UPS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }

    /// Interpret a spoken command. Imperative commands yield a mutation for the caller.
    pub fn interpret(&mut self, utterance: &str, tasks: &[Task]) -> Interpretation {
        let intent = classify(utterance, Surface::Voice);
        let (response, mutation) = match &intent {
            Intent::Command(Command::AddTask { title }) => self.add_task(title, tasks),
            Intent::Command(Command::CompleteTask { name }) => complete_task(name, tasks),
            Intent::Query(query) => (Response::plain(self.answer(*query, tasks)), None),
            Intent::Unrecognized => (Response::plain(replies::VOICE_FALLBACK), None),
        };
        tracing::debug!(
            intent = intent.label(),
            surface = "voice",
            mutation = mutation.as_ref().map(|m| m.label()),
            "utterance classified"
        );
        Interpretation {
            intent,
            response,
            mutation,
        }
    }

    fn answer(&mut self, query: Query, tasks: &[Task]) -> String {
        let now = self.clock.now();
        match query {
            Query::Overdue => {
                let overdue = queries::overdue(tasks, now);
                replies::overdue(&queries::titles(&overdue), overdue.len())
            }
            Query::Priorities => {
                let high = queries::high_priority_pending(tasks);
                replies::priorities(&queries::titles(&high), high.len())
            }
            Query::Motivation => {
                let index = self.random.pick(replies::MOTIVATION_TEMPLATE_COUNT);
                replies::motivation(index, queries::completed(tasks).len())
            }
            Query::Progress => replies::progress(Progress::of(tasks)),
            Query::Suggestions => replies::SUGGESTIONS.to_string(),
            Query::Help => replies::HELP.to_string(),
            Query::PendingList => replies::pending(&queries::pending(tasks)),
            Query::DueToday => {
                let today = self.clock.today();
                replies::due_today(&queries::pending_due_on(tasks, today, self.clock.as_ref()))
            }
        }
    }

    fn add_task(&self, title: &str, tasks: &[Task]) -> (Response, Option<TaskMutation>) {
        let title = title.trim();
        if title.is_empty() {
            return (Response::plain(replies::ADD_NEEDS_TITLE), None);
        }
        let now = self.clock.now();
        let task = Task {
            id: next_task_id(tasks, now),
            title: title.to_string(),
            description: VOICE_TASK_DESCRIPTION.to_string(),
            priority: Priority::Medium,
            due_date: now + Duration::hours(24),
            completed: false,
            category: VOICE_TASK_CATEGORY.to_string(),
            recurrence: None,
        };
        (
            Response::plain(replies::task_added(title)),
            Some(TaskMutation::Add(task)),
        )
    }
}

fn complete_task(name: &str, tasks: &[Task]) -> (Response, Option<TaskMutation>) {
    let needle = name.trim().to_lowercase();
    let found = if needle.is_empty() {
        None
    } else {
        tasks
            .iter()
            .find(|task| !task.completed && task.title.to_lowercase().contains(&needle))
    };
    match found {
        Some(task) => (
            Response::plain(replies::task_completed(&task.title)),
            Some(TaskMutation::Complete(task.id)),
        ),
        None => (Response::plain(replies::TASK_NOT_FOUND), None),
    }
}
