use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::capture::TaskInput;
use crate::clock::Clock;
use crate::error::TaskError;
use crate::model::{DeleteResult, StatusUpdate, Task, TaskFilter, TaskId};
use crate::store::{TaskSnapshot, TaskStore};

/// A change requested by the assistant, applied by whoever owns the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
    Add(Task),
    Complete(TaskId),
}

impl TaskMutation {
    pub fn label(&self) -> &'static str {
        match self {
            TaskMutation::Add(_) => "add",
            TaskMutation::Complete(_) => "complete",
        }
    }
}

/// Allocate an id from the clock, bumped past any id already in use.
pub fn next_task_id(tasks: &[Task], now: DateTime<Utc>) -> TaskId {
    let from_clock = now.timestamp_millis().max(0) as u64;
    let after_existing = tasks
        .iter()
        .map(|task| task.id.0.saturating_add(1))
        .max()
        .unwrap_or(0);
    TaskId(from_clock.max(after_existing))
}

#[derive(Clone)]
pub struct TasksService {
    store: TaskStore,
    clock: Arc<dyn Clock>,
}

impl TasksService {
    pub fn new(store: TaskStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        self.store.snapshot()
    }

    pub fn list(&self, filter: TaskFilter) -> Vec<Task> {
        self.store
            .snapshot()
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }

    pub fn fetch_task(&self, id: TaskId) -> Option<Task> {
        self.store.snapshot().find(id).cloned()
    }

    pub fn add(&self, input: TaskInput) -> Result<Task, TaskError> {
        let snapshot = self.store.snapshot();
        let now = self.clock.now();
        let task = input.into_task(next_task_id(&snapshot, now), now)?;
        let mut tasks = snapshot.to_vec();
        tasks.push(task.clone());
        self.store.replace(tasks);
        tracing::debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    /// Replace every field of an existing task, keeping its id and position.
    pub fn update(&self, id: TaskId, input: TaskInput) -> Result<Task, TaskError> {
        let snapshot = self.store.snapshot();
        if snapshot.find(id).is_none() {
            return Err(TaskError::UnknownTask(id));
        }
        let updated = input.into_task(id, self.clock.now())?;
        let tasks = snapshot
            .iter()
            .map(|task| {
                if task.id == id {
                    updated.clone()
                } else {
                    task.clone()
                }
            })
            .collect();
        self.store.replace(tasks);
        tracing::debug!(task_id = %id, "task updated");
        Ok(updated)
    }

    pub fn toggle_complete(&self, id: TaskId) -> Result<Task, TaskError> {
        let current = self.fetch_task(id).ok_or(TaskError::UnknownTask(id))?;
        let toggled = !current.completed;
        self.set_completed(&[id], toggled);
        Ok(Task {
            completed: toggled,
            ..current
        })
    }

    pub fn set_completed(&self, ids: &[TaskId], completed: bool) -> Vec<StatusUpdate> {
        let snapshot = self.store.snapshot();
        let wanted: HashSet<TaskId> = ids.iter().copied().collect();
        let mut changed = HashSet::new();
        let tasks: Vec<Task> = snapshot
            .iter()
            .map(|task| {
                if wanted.contains(&task.id) && task.completed != completed {
                    changed.insert(task.id);
                    Task {
                        completed,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();
        if !changed.is_empty() {
            self.store.replace(tasks);
        }
        ids.iter()
            .map(|id| StatusUpdate {
                id: *id,
                changed: changed.contains(id),
            })
            .collect()
    }

    pub fn delete(&self, ids: &[TaskId]) -> Vec<DeleteResult> {
        let snapshot = self.store.snapshot();
        let wanted: HashSet<TaskId> = ids.iter().copied().collect();
        let present: HashSet<TaskId> = snapshot
            .iter()
            .map(|task| task.id)
            .filter(|id| wanted.contains(id))
            .collect();
        if !present.is_empty() {
            let kept = snapshot
                .iter()
                .filter(|task| !present.contains(&task.id))
                .cloned()
                .collect();
            self.store.replace(kept);
        }
        ids.iter()
            .map(|id| DeleteResult {
                id: *id,
                deleted: present.contains(id),
            })
            .collect()
    }

    pub fn apply(&self, mutation: &TaskMutation) -> Result<Task, TaskError> {
        match mutation {
            TaskMutation::Add(task) => {
                let mut tasks = self.store.snapshot().to_vec();
                tasks.push(task.clone());
                self.store.replace(tasks);
                Ok(task.clone())
            }
            TaskMutation::Complete(id) => {
                let current = self.fetch_task(*id).ok_or(TaskError::UnknownTask(*id))?;
                self.set_completed(&[*id], true);
                Ok(Task {
                    completed: true,
                    ..current
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::Priority;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn service() -> (TasksService, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap());
        let service = TasksService::new(TaskStore::empty(), Arc::new(clock.clone()));
        (service, clock)
    }

    #[test]
    fn add_allocates_unique_ids_on_a_frozen_clock() {
        let (service, _clock) = service();
        let first = service.add(TaskInput::titled("Draft agenda")).unwrap();
        let second = service.add(TaskInput::titled("Book room")).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.id.0, first.id.0 + 1);
        let titles: Vec<String> = service
            .list(TaskFilter::All)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Draft agenda", "Book room"]);
    }

    #[test]
    fn toggle_flips_completion_and_filters_follow() {
        let (service, _clock) = service();
        let task = service.add(TaskInput::titled("Stretch")).unwrap();
        let toggled = service.toggle_complete(task.id).unwrap();
        assert!(toggled.completed);
        assert_eq!(service.list(TaskFilter::Completed).len(), 1);
        assert!(service.list(TaskFilter::Pending).is_empty());

        let again = service.toggle_complete(task.id).unwrap();
        assert!(!again.completed);
        assert_eq!(
            service.toggle_complete(TaskId(42)),
            Err(TaskError::UnknownTask(TaskId(42)))
        );
    }

    #[test]
    fn update_keeps_id_and_position() {
        let (service, _clock) = service();
        let a = service.add(TaskInput::titled("A")).unwrap();
        let b = service.add(TaskInput::titled("B")).unwrap();
        let mut input = TaskInput::from(&a);
        input.title = "A revised".into();
        input.priority = Priority::High;
        service.update(a.id, input).unwrap();

        let tasks = service.list(TaskFilter::All);
        assert_eq!(tasks[0].id, a.id);
        assert_eq!(tasks[0].title, "A revised");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].id, b.id);
        assert_eq!(
            service.update(TaskId(1), TaskInput::titled("x")),
            Err(TaskError::UnknownTask(TaskId(1)))
        );
    }

    #[test]
    fn delete_reports_missing_ids() {
        let (service, _clock) = service();
        let task = service.add(TaskInput::titled("Temp")).unwrap();
        let version = service.snapshot().version();
        let results = service.delete(&[task.id, TaskId(7)]);
        assert_eq!(
            results,
            vec![
                DeleteResult {
                    id: task.id,
                    deleted: true
                },
                DeleteResult {
                    id: TaskId(7),
                    deleted: false
                },
            ]
        );
        assert!(service.store().is_empty());

        let untouched = service.delete(&[TaskId(7)]);
        assert!(!untouched[0].deleted);
        assert_eq!(service.snapshot().version(), version + 1);
    }

    #[test]
    fn next_id_prefers_clock_but_skips_existing() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap();
        assert_eq!(next_task_id(&[], now).0, now.timestamp_millis() as u64);
    }
}
