// Error taxonomy for board mutations
//
// Every rejected write maps to exactly one of these variants; none of them
// is retried automatically inside the core. Retry policy belongs to clients.

use crate::models::Task;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Unknown task id, including a task deleted while another client was
    /// still editing it.
    #[error("Task not found")]
    NotFound,

    /// The stored version moved on since the client last fetched. Carries
    /// both snapshots so nothing is lost: the live record and the client's
    /// rejected submission.
    #[error("Version conflict on task {}: stored version {}, client sent {}", .current.id, .current.version, .client.version)]
    VersionConflict {
        current: Box<Task>,
        client: Box<Task>,
    },

    /// Malformed field values (e.g. empty title). Never retried.
    #[error("{0}")]
    Validation(String),

    /// Smart assign was requested but the user directory is empty.
    #[error("No users available for assignment")]
    NoAssigneeAvailable,

    /// Usernames are unique within the directory.
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),
}

impl BoardError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, BoardError::VersionConflict { .. })
    }
}
