use chrono::{DateTime, Duration, Utc};

use crate::model::{Priority, Recurrence, Task, TaskId};

/// The starter set every session begins with, due relative to `now`.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: TaskId(1),
            title: "Review project proposal".into(),
            description: "Review and provide feedback on the Q4 project proposal".into(),
            priority: Priority::High,
            due_date: now + Duration::hours(2),
            completed: false,
            category: "work".into(),
            recurrence: None,
        },
        Task {
            id: TaskId(2),
            title: "Team meeting".into(),
            description: "Weekly team sync-up meeting".into(),
            priority: Priority::Medium,
            due_date: now + Duration::hours(24),
            completed: false,
            category: "meetings".into(),
            recurrence: Some(Recurrence::Weekly),
        },
        Task {
            id: TaskId(3),
            title: "Complete workout".into(),
            description: "Morning cardio session".into(),
            priority: Priority::Low,
            due_date: now + Duration::hours(12),
            completed: true,
            category: "personal".into(),
            recurrence: Some(Recurrence::Daily),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::Progress;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_is_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap();
        let tasks = seed_tasks(now);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].due_date - now, Duration::hours(2));
        assert!(tasks[1].is_recurring());
        assert_eq!(
            Progress::of(&tasks),
            Progress {
                completed: 1,
                total: 3,
                percent: 33
            }
        );
    }
}
