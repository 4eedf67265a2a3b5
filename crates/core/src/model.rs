use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse::<u64>().map(TaskId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank, highest priority first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            other => Err(TaskError::UnknownPriority(other.to_string())),
        }
    }
}

impl ValueEnum for Priority {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Recurrence cadence. Stored on the task but never used to spawn new occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Recurrence::Daily),
            "weekly" | "week" => Ok(Recurrence::Weekly),
            "monthly" | "month" => Ok(Recurrence::Monthly),
            "yearly" | "year" | "annually" => Ok(Recurrence::Yearly),
            other => Err(TaskError::UnknownRecurrence(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(TaskFilter::All),
            "pending" | "open" => Ok(TaskFilter::Pending),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(anyhow::anyhow!(
                "Unknown filter '{}': expected all|pending|completed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub category: String,
    #[serde(
        default,
        rename = "recurringType",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurrence: Option<Recurrence>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: TaskId,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub id: TaskId,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(completed: bool, due_in_minutes: i64, now: DateTime<Utc>) -> Task {
        Task {
            id: TaskId(1),
            title: "Write report".into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: now + Duration::minutes(due_in_minutes),
            completed,
            category: "work".into(),
            recurrence: None,
        }
    }

    #[test]
    fn parses_priority_labels() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("med".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(TaskError::UnknownPriority("urgent".into()))
        );
    }

    #[test]
    fn overdue_requires_incomplete_and_past_due() {
        let now = Utc::now();
        assert!(task(false, -5, now).is_overdue(now));
        assert!(!task(true, -5, now).is_overdue(now));
        assert!(!task(false, 5, now).is_overdue(now));
        assert!(!task(false, 0, now).is_overdue(now));
    }

    #[test]
    fn serializes_with_camel_case_and_recurring_type() {
        let now = Utc::now();
        let mut recurring = task(false, 10, now);
        recurring.recurrence = Some(Recurrence::Weekly);
        let value = serde_json::to_value(&recurring).unwrap();
        assert_eq!(value["recurringType"], "weekly");
        assert!(value.get("dueDate").is_some());

        let single = serde_json::to_value(task(false, 10, now)).unwrap();
        assert!(single.get("recurringType").is_none());
    }

    #[test]
    fn filter_matches_completion_state() {
        let now = Utc::now();
        let open = task(false, 10, now);
        let done = task(true, 10, now);
        assert!(TaskFilter::All.matches(&open) && TaskFilter::All.matches(&done));
        assert!(TaskFilter::Pending.matches(&open) && !TaskFilter::Pending.matches(&done));
        assert!(TaskFilter::Completed.matches(&done) && !TaskFilter::Completed.matches(&open));
    }
}
