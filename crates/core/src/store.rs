//! In-memory task collection with whole-collection replacement.
//!
//! Readers get an immutable [`TaskSnapshot`]; writers hand over a complete new
//! collection. A snapshot taken before a replace keeps seeing the old tasks.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    tasks: Arc<[Task]>,
    version: u64,
}

impl TaskSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.to_vec()
    }
}

impl Deref for TaskSnapshot {
    type Target = [Task];

    fn deref(&self) -> &Self::Target {
        &self.tasks
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    tasks: RwLock<Arc<[Task]>>,
    version: AtomicU64,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tasks: RwLock::new(tasks.into()),
                version: AtomicU64::new(0),
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let tasks = self.inner.tasks.read();
        TaskSnapshot {
            tasks: Arc::clone(&tasks),
            version: self.inner.version.load(Ordering::Acquire),
        }
    }

    pub fn replace(&self, tasks: Vec<Task>) {
        let mut guard = self.inner.tasks.write();
        *guard = tasks.into();
        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(version, count = guard.len(), "task store replaced");
    }

    pub fn len(&self) -> usize {
        self.inner.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::empty()
    }
}
