//! Authoritative, versioned task store
//!
//! Owns the only copy of every task. All mutations go through
//! [`TaskStore::compare_and_set`], which succeeds only when the caller's
//! expected version matches the stored one and bumps the version by exactly 1.
//!
//! Locking is per task id: the outer `RwLock` guards the id table and is held
//! only long enough to clone a slot handle, while the compare-and-apply step
//! holds that task's own mutex. Writers of different ids never serialize
//! against each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use uuid::Uuid;

use crate::error::BoardError;
use crate::models::{Task, TaskDraft, TaskFields, TaskStatus};

/// Per-task slot. `None` marks a deleted task, so an in-flight write that
/// grabbed the handle before deletion observes NotFound instead of reviving
/// the record.
struct Slot {
    task: Option<Task>,
}

struct Inner {
    slots: HashMap<String, Arc<Mutex<Slot>>>,
    /// Ids in creation order, for stable `list` iteration.
    order: Vec<String>,
}

pub struct TaskStore {
    inner: RwLock<Inner>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                slots: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Create a task with a fresh id at version 0, status Todo.
    pub fn create(&self, draft: TaskDraft) -> Task {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: TaskStatus::Todo,
            assigned_user: None,
            version: 0,
        };

        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        inner.order.push(task.id.clone());
        inner.slots.insert(
            task.id.clone(),
            Arc::new(Mutex::new(Slot {
                task: Some(task.clone()),
            })),
        );
        task
    }

    /// Snapshot a single task.
    pub fn get(&self, id: &str) -> Option<Task> {
        let slot = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            inner.slots.get(id).cloned()?
        };
        let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.task.clone()
    }

    /// Snapshot all tasks in creation order.
    pub fn list(&self) -> Vec<Task> {
        let (order, slots) = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            (inner.order.clone(), inner.slots.clone())
        };

        order
            .iter()
            .filter_map(|id| {
                let slot = slots.get(id)?;
                let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                slot.task.clone()
            })
            .collect()
    }

    /// Apply `fields` iff the stored version equals `expected`.
    ///
    /// On success the version advances by exactly 1 and the new authoritative
    /// snapshot is returned. On a version mismatch nothing changes and the
    /// error carries both the live snapshot and the client's rejected one.
    pub fn compare_and_set(
        &self,
        id: &str,
        expected: u64,
        fields: TaskFields,
    ) -> Result<Task, BoardError> {
        let slot = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            inner.slots.get(id).cloned().ok_or(BoardError::NotFound)?
        };

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let task = slot.task.as_mut().ok_or(BoardError::NotFound)?;

        if task.version != expected {
            return Err(BoardError::VersionConflict {
                current: Box::new(task.clone()),
                client: Box::new(fields.into_task(id, expected)),
            });
        }

        task.title = fields.title;
        task.description = fields.description;
        task.priority = fields.priority;
        task.status = fields.status;
        task.assigned_user = fields.assigned_user;
        task.version += 1;

        Ok(task.clone())
    }

    /// Remove a task. Deliberately not version-checked: deletes are
    /// destructive and idempotent enough that any holder may issue one.
    /// Returns the last snapshot for audit purposes.
    pub fn delete(&self, id: &str) -> Result<Task, BoardError> {
        let slot = {
            let mut inner = self
                .inner
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let slot = inner.slots.remove(id).ok_or(BoardError::NotFound)?;
            inner.order.retain(|entry| entry != id);
            slot
        };

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.task.take().ok_or(BoardError::NotFound)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
