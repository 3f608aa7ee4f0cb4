// Data models matching the frontend board types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board column a task lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A board member that tasks can be assigned to.
///
/// Tasks hold users by value, never by ownership: a user removed from the
/// directory leaves stale copies on tasks, which render as "unassigned"
/// rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
}

/// One unit of work on the board.
///
/// `version` starts at 0 on creation and increases by exactly 1 on every
/// accepted mutation. Clients echo it back as the expected pre-image for
/// their next write; they never set it directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_user: Option<User>,
    pub version: u64,
}

/// Request body for creating a task. Status always starts at Todo and the
/// server allocates the id and version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

/// The mutable field set of a task, as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_user: Option<User>,
}

impl TaskFields {
    /// Reconstruct the client's view of the task from its submitted fields.
    /// Used to hand both sides of a rejected write back to the caller.
    pub fn into_task(self, id: &str, version: u64) -> Task {
        Task {
            id: id.to_string(),
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            assigned_user: self.assigned_user,
            version,
        }
    }
}

/// A full write intent: the desired field values plus the version the client
/// believes is current.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    #[serde(flatten)]
    pub fields: TaskFields,
    pub version: u64,
}

/// Immutable audit record of one accepted mutation.
///
/// A missing user renders as "System" on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub user: Option<User>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_match_board_columns() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Todo).unwrap(), "\"Todo\"");
        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: "t1".to_string(),
            title: "Write docs".to_string(),
            description: String::new(),
            priority: Priority::High,
            status: TaskStatus::Todo,
            assigned_user: Some(User {
                id: "u1".to_string(),
                username: "alice".to_string(),
            }),
            version: 3,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assignedUser"]["username"], "alice");
        assert_eq!(json["version"], 3);
        assert_eq!(json["priority"], "High");
    }

    #[test]
    fn test_draft_defaults() {
        let draft: TaskDraft = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.description.is_empty());
    }

    #[test]
    fn test_submission_flattens_fields() {
        let body = r#"{
            "title": "Write spec",
            "description": "",
            "priority": "High",
            "status": "In Progress",
            "assignedUser": null,
            "version": 2
        }"#;
        let submission: TaskSubmission = serde_json::from_str(body).unwrap();
        assert_eq!(submission.version, 2);
        assert_eq!(submission.fields.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_submission_ignores_unknown_fields() {
        // Clients resubmit entire task snapshots, id included.
        let body = r#"{"id":"t1","title":"Keep","version":0}"#;
        let submission: TaskSubmission = serde_json::from_str(body).unwrap();
        assert_eq!(submission.fields.title, "Keep");
        assert_eq!(submission.version, 0);
    }
}
