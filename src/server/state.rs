//! Server application state shared across handlers

use std::sync::Arc;

use crate::arbiter::ConflictArbiter;
use crate::events::ChangeBroadcaster;
use crate::ledger::ActivityLedger;
use crate::shutdown::ShutdownState;
use crate::store::TaskStore;
use crate::users::UserDirectory;

/// Shared state for the server: the authoritative store, the arbiter that
/// guards it, and the fan-out/audit collaborators. Built once at startup and
/// injected everywhere; nothing here is a module-level singleton.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative versioned task store
    pub store: Arc<TaskStore>,

    /// Event fan-out to connected WebSocket clients
    pub broadcaster: Arc<ChangeBroadcaster>,

    /// Append-only audit trail
    pub ledger: Arc<ActivityLedger>,

    /// Write path: validation, compare-and-set, event emission
    pub arbiter: Arc<ConflictArbiter>,

    /// Known board members, for smart assign and actor attribution
    pub users: Arc<UserDirectory>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl AppState {
    /// Create a new application state with all collaborators wired together
    pub fn new(shutdown_state: ShutdownState) -> Self {
        let store = Arc::new(TaskStore::new());
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let ledger = Arc::new(ActivityLedger::new());
        let arbiter = Arc::new(ConflictArbiter::new(
            Arc::clone(&store),
            Arc::clone(&broadcaster),
            Arc::clone(&ledger),
        ));

        Self {
            store,
            broadcaster,
            ledger,
            arbiter,
            users: Arc::new(UserDirectory::new()),
            shutdown_state,
        }
    }
}
