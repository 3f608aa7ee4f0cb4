//! HTTP route handlers
//!
//! Organized by domain:
//! - task_routes: task CRUD, conflict-checked updates, smart assign
//! - action_routes: activity ledger reads
//! - user_routes: user directory management
//!
//! All handlers speak JSON and surface domain errors through [`ApiError`],
//! which maps the tagged error variants onto HTTP statuses instead of
//! letting callers branch on loose status codes.

pub mod action_routes;
pub mod task_routes;
pub mod user_routes;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::AppState;
use crate::error::BoardError;
use crate::models::User;

/// Newtype wrapper that gives [`BoardError`] an HTTP rendering.
pub struct ApiError(pub BoardError);

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            BoardError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Task not found" })),
            )
                .into_response(),

            // The conflict payload carries both snapshots so the client can
            // render a resolution dialog without another fetch.
            BoardError::VersionConflict { current, client } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": "Version conflict",
                    "currentVersion": current,
                    "clientVersion": client,
                })),
            )
                .into_response(),

            BoardError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),

            BoardError::NoAssigneeAvailable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "No users available for assignment" })),
            )
                .into_response(),

            BoardError::DuplicateUsername(username) => (
                StatusCode::CONFLICT,
                Json(json!({ "message": format!("Username '{}' is already taken", username) })),
            )
                .into_response(),
        }
    }
}

/// Resolve the acting user from the `X-User-Id` header. Authentication is
/// the transport layer's problem; an absent or unknown id attributes the
/// action to "System".
pub fn actor_from_headers(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let id = headers.get("x-user-id")?.to_str().ok()?;
    let user = state.users.get(id);
    if user.is_none() {
        log::debug!("Unknown X-User-Id '{}', attributing to System", id);
    }
    user
}
