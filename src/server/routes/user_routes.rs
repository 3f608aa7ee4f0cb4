//! User directory endpoints
//!
//! Only id/username management lives here; credentials and session issuance
//! belong to the external auth layer.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.add(&body.username)?;
    log::info!("Registered user '{}'", user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.all())
}
