//! Task endpoints
//!
//! Handles: create, list, fetch, conflict-checked update, delete, smart
//! assign. Every mutation goes through the arbiter so broadcast and ledger
//! stay consistent with what the store committed.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};

use super::{actor_from_headers, ApiError, AppState};
use crate::models::{Task, TaskDraft, TaskSubmission};

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let actor = actor_from_headers(&state, &headers);
    let task = state.arbiter.create_task(actor, draft)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.list())
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or(ApiError(crate::error::BoardError::NotFound))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(submission): Json<TaskSubmission>,
) -> Result<Json<Task>, ApiError> {
    let actor = actor_from_headers(&state, &headers);
    let task = state.arbiter.update_task(actor, &id, submission)?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&state, &headers);
    state.arbiter.delete_task(actor, &id)?;
    Ok(Json(json!({ "message": "Task deleted" })))
}

/// POST /api/tasks/smart-assign/{id}
pub async fn smart_assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Task>, ApiError> {
    let actor = actor_from_headers(&state, &headers);
    let users = state.users.all();
    let task = state.arbiter.smart_assign(actor, &id, &users)?;
    Ok(Json(task))
}
