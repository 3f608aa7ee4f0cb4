//! Board change events and the broadcast fabric
//!
//! One authoritative publish per accepted or rejected mutation, fanned out to
//! every connected session. The broadcaster is injected through server state;
//! there is deliberately no module-level channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{ActivityLogEntry, Task};

/// A committed-state or conflict notification.
///
/// Wire shape is `{"event": <name>, "payload": {...}}`, with the names the
/// board frontend listens for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum BoardEvent {
    /// A task was created or updated; payload is the full authoritative
    /// snapshot. Consumers that already hold this id+version apply it as a
    /// no-op.
    TaskUpdated(Task),

    /// A task was removed. Only the id travels, not a full record.
    #[serde(rename_all = "camelCase")]
    TaskDeleted { task_id: String },

    /// A write was rejected on its version check. Carries both snapshots,
    /// current first, so any session can render the resolution choice.
    #[serde(rename = "resolveConflict", rename_all = "camelCase")]
    ConflictDetected {
        task_id: String,
        versions: [Task; 2],
    },

    /// An entry was appended to the activity ledger.
    ActionLogged(ActivityLogEntry),
}

impl BoardEvent {
    /// Task id this event concerns.
    pub fn task_id(&self) -> &str {
        match self {
            BoardEvent::TaskUpdated(task) => &task.id,
            BoardEvent::TaskDeleted { task_id } => task_id,
            BoardEvent::ConflictDetected { task_id, .. } => task_id,
            BoardEvent::ActionLogged(entry) => &entry.task_id,
        }
    }
}

/// Broadcasts board events to all connected WebSocket clients.
pub struct ChangeBroadcaster {
    tx: broadcast::Sender<BoardEvent>,
}

impl ChangeBroadcaster {
    /// Create a new broadcaster with a channel capacity of 1000 events.
    /// Subscribers that fall more than a full buffer behind are lagged out
    /// and must re-fetch board state.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1000);
        Self { tx }
    }

    /// Publish an event to all connected clients. Never blocks; a send with
    /// no receivers is not an error.
    pub fn publish(&self, event: BoardEvent) {
        if let Err(err) = self.tx.send(event) {
            log::trace!("No subscribers for event: {}", err);
        }
    }

    /// Subscribe to events (returns a receiver).
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
