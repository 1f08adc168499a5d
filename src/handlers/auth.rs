use crate::core::error::{AuthError, StorageError};
use crate::core::state::AppState;
use crate::models::api::{LoginRequest, RegisterRequest, SessionResponse, SuccessResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Current session
///
/// GET /session
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(SessionResponse::from_session(&state.session()))
}

/// Sign in with email and password
///
/// POST /auth/login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let mut session = state.session();
    session.login(&body.email, &body.password)?;

    Ok((StatusCode::OK, Json(SessionResponse::from_session(&session))).into_response())
}

/// Create an account and sign in
///
/// POST /auth/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, AuthError> {
    let mut session = state.session();
    session.register(&body.name, &body.email, &body.password, body.phone)?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from_session(&session))).into_response())
}

/// Sign out
///
/// POST /auth/logout
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, StorageError> {
    state.session().logout()?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
        .into_response())
}
