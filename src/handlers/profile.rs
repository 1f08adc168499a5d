use crate::core::error::StorageError;
use crate::core::state::AppState;
use crate::models::api::SessionResponse;
use crate::models::user::UserUpdate;
use axum::{extract::State, response::Json};
use std::sync::Arc;

/// Edit profile fields of the signed-in user
///
/// PATCH /profile
///
/// Anonymous sessions are left untouched and reported as such.
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<SessionResponse>, StorageError> {
    let mut session = state.session();
    session.update_user(update)?;

    Ok(Json(SessionResponse::from_session(&session)))
}
