//! Append-only activity ledger
//!
//! Records every accepted mutation, in acceptance order. Entries are never
//! updated or deleted; the external read surface is capped at the most
//! recent [`RECENT_LIMIT`] entries, newest first.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{ActivityLogEntry, User};

/// How many entries `GET /api/actions` exposes.
pub const RECENT_LIMIT: usize = 20;

pub struct ActivityLedger {
    entries: Mutex<Vec<ActivityLogEntry>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a pre-built entry.
    pub fn append(&self, entry: ActivityLogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);
    }

    /// Build, append, and return an entry for an accepted mutation. The
    /// returned copy is what gets broadcast as `actionLogged`.
    pub fn record(
        &self,
        user: Option<User>,
        task_id: &str,
        action: impl Into<String>,
    ) -> ActivityLogEntry {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4().to_string(),
            user,
            action: action.into(),
            timestamp: Utc::now(),
            task_id: task_id.to_string(),
        };
        self.append(entry.clone());
        entry
    }

    /// The `n` most recent entries, most-recent-first.
    pub fn recent(&self, n: usize) -> Vec<ActivityLogEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLedger {
    fn default() -> Self {
        Self::new()
    }
}
