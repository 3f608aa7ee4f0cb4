//! Conflict arbiter
//!
//! Every externally-initiated mutation passes through here. The arbiter
//! validates the submission, runs it through the store's compare-and-set,
//! and emits exactly one authoritative event per outcome: `taskUpdated` /
//! `taskDeleted` plus a ledger entry on commit, `resolveConflict` on a
//! version rejection. Rejected writes never touch the ledger.

use std::sync::Arc;

use crate::error::BoardError;
use crate::events::{BoardEvent, ChangeBroadcaster};
use crate::ledger::ActivityLedger;
use crate::models::{Task, TaskDraft, TaskFields, TaskSubmission, User};
use crate::planner::choose_assignee;
use crate::store::TaskStore;

pub struct ConflictArbiter {
    store: Arc<TaskStore>,
    broadcaster: Arc<ChangeBroadcaster>,
    ledger: Arc<ActivityLedger>,
}

impl ConflictArbiter {
    pub fn new(
        store: Arc<TaskStore>,
        broadcaster: Arc<ChangeBroadcaster>,
        ledger: Arc<ActivityLedger>,
    ) -> Self {
        Self {
            store,
            broadcaster,
            ledger,
        }
    }

    /// Create a task at version 0 and announce it.
    pub fn create_task(&self, actor: Option<User>, draft: TaskDraft) -> Result<Task, BoardError> {
        validate_title(&draft.title)?;

        let task = self.store.create(draft);
        log::info!("Created task {} at version 0", task.id);
        self.committed(actor, &task, format!("created task '{}'", task.title));
        Ok(task)
    }

    /// Apply a client's write intent through the version check.
    ///
    /// On a conflict the store already advanced past the client's snapshot,
    /// so the caller must re-fetch the live version before resubmitting; a
    /// third writer may interleave and reject the resubmission again. That
    /// is optimistic retry, not a lock.
    pub fn update_task(
        &self,
        actor: Option<User>,
        id: &str,
        submission: TaskSubmission,
    ) -> Result<Task, BoardError> {
        validate_title(&submission.fields.title)?;

        match self
            .store
            .compare_and_set(id, submission.version, submission.fields)
        {
            Ok(task) => {
                self.committed(actor, &task, format!("updated task '{}'", task.title));
                Ok(task)
            }
            Err(BoardError::VersionConflict { current, client }) => {
                log::warn!(
                    "Version conflict on task {}: stored {}, client {}",
                    id,
                    current.version,
                    client.version
                );
                self.broadcaster.publish(BoardEvent::ConflictDetected {
                    task_id: id.to_string(),
                    versions: [(*current).clone(), (*client).clone()],
                });
                Err(BoardError::VersionConflict { current, client })
            }
            Err(err) => Err(err),
        }
    }

    /// Remove a task. No version check; a bare deletion marker is broadcast
    /// instead of a full record.
    pub fn delete_task(&self, actor: Option<User>, id: &str) -> Result<(), BoardError> {
        let removed = self.store.delete(id)?;
        log::info!("Deleted task {}", id);

        self.broadcaster.publish(BoardEvent::TaskDeleted {
            task_id: id.to_string(),
        });
        let entry = self
            .ledger
            .record(actor, id, format!("deleted task '{}'", removed.title));
        self.broadcaster.publish(BoardEvent::ActionLogged(entry));
        Ok(())
    }

    /// Assign the least-loaded user to a task, subject to the same version
    /// check as any other edit.
    pub fn smart_assign(
        &self,
        actor: Option<User>,
        id: &str,
        users: &[User],
    ) -> Result<Task, BoardError> {
        let snapshot = self.store.get(id).ok_or(BoardError::NotFound)?;
        let assignee = choose_assignee(users, &self.store.list())?;

        let fields = TaskFields {
            title: snapshot.title.clone(),
            description: snapshot.description.clone(),
            priority: snapshot.priority,
            status: snapshot.status,
            assigned_user: Some(assignee.clone()),
        };

        match self.store.compare_and_set(id, snapshot.version, fields) {
            Ok(task) => {
                self.committed(
                    actor,
                    &task,
                    format!("assigned task '{}' to {}", task.title, assignee.username),
                );
                Ok(task)
            }
            Err(BoardError::VersionConflict { current, client }) => {
                self.broadcaster.publish(BoardEvent::ConflictDetected {
                    task_id: id.to_string(),
                    versions: [(*current).clone(), (*client).clone()],
                });
                Err(BoardError::VersionConflict { current, client })
            }
            Err(err) => Err(err),
        }
    }

    /// Post-commit fan-out: one authoritative task event, one ledger entry,
    /// one `actionLogged` event. Must never fail the already-final commit.
    fn committed(&self, actor: Option<User>, task: &Task, action: String) {
        self.broadcaster.publish(BoardEvent::TaskUpdated(task.clone()));
        let entry = self.ledger.record(actor, &task.id, action);
        self.broadcaster.publish(BoardEvent::ActionLogged(entry));
    }
}

fn validate_title(title: &str) -> Result<(), BoardError> {
    if title.trim().is_empty() {
        return Err(BoardError::Validation("Title must not be empty".to_string()));
    }
    Ok(())
}
