//! Activity ledger endpoints

use axum::{extract::State, Json};

use super::AppState;
use crate::ledger::RECENT_LIMIT;
use crate::models::ActivityLogEntry;

/// GET /api/actions — the 20 most recent ledger entries, newest first.
pub async fn recent_actions(State(state): State<AppState>) -> Json<Vec<ActivityLogEntry>> {
    Json(state.ledger.recent(RECENT_LIMIT))
}
