use chrono::{DateTime, Utc};

use crate::error::TaskError;
use crate::model::{Priority, Recurrence, Task, TaskId};

pub const DEFAULT_CATEGORY: &str = "work";

/// Normalized input for creating or editing a task from any surface (form, shell, voice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Defaults to the moment of saving when unset.
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub category: String,
    pub recurrence: Option<Recurrence>,
}

impl Default for TaskInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            category: DEFAULT_CATEGORY.to_string(),
            recurrence: None,
        }
    }
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn require_title(&self) -> Result<(), TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        Ok(())
    }

    pub fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Result<Task, TaskError> {
        self.require_title()?;
        let category = self.category.trim();
        Ok(Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            priority: self.priority,
            due_date: self.due_date.unwrap_or(now),
            completed: self.completed,
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            recurrence: self.recurrence,
        })
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: Some(task.due_date),
            completed: task.completed,
            category: task.category.clone(),
            recurrence: task.recurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let input = TaskInput::titled("   ");
        assert_eq!(
            input.into_task(TaskId(1), Utc::now()),
            Err(TaskError::EmptyTitle)
        );
    }

    #[test]
    fn defaults_fill_due_date_and_category() {
        let now = Utc::now();
        let mut input = TaskInput::titled("  Plan sprint ");
        input.category = " ".into();
        let task = input.into_task(TaskId(5), now).unwrap();
        assert_eq!(task.title, "Plan sprint");
        assert_eq!(task.due_date, now);
        assert_eq!(task.category, DEFAULT_CATEGORY);
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
    }
}
