// Centralized error handling for the studio portal

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::api::ErrorResponse;

/// Errors raised while reading or writing persisted snapshots
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt value under key '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Unsupported snapshot version {version} under key '{key}'")]
    UnsupportedVersion { key: String, version: u32 },
}

/// Errors returned by login and registration
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No account is registered with this email")]
    NotFound,

    #[error("Incorrect password")]
    InvalidCredential,

    #[error("An account with this email already exists")]
    AlreadyExists,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors returned by the guarded booking path
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Sign in to book a class")]
    NotAuthenticated,

    #[error("An active membership is required to book a class")]
    NoMembership,

    #[error("Membership expired")]
    MembershipExpired,

    #[error("No classes remaining on this membership")]
    NoClassesRemaining,

    #[error("Membership is only valid for {allowed} classes")]
    StyleMismatch { allowed: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn error_body(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        error!(error = %self, "Storage failure while handling request");
        error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    }
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AuthError::AlreadyExists => StatusCode::CONFLICT,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Storage(e) => e.into_response(),
            other => error_body(other.status(), other.to_string()),
        }
    }
}

impl BookingError {
    fn status(&self) -> StatusCode {
        match self {
            BookingError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            BookingError::NoMembership
            | BookingError::MembershipExpired
            | BookingError::NoClassesRemaining
            | BookingError::StyleMismatch { .. } => StatusCode::FORBIDDEN,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match self {
            BookingError::Storage(e) => e.into_response(),
            other => error_body(other.status(), other.to_string()),
        }
    }
}
