use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};

use crate::models::api::ErrorResponse;

pub async fn fallback_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!("No route for {}", uri.path()),
        }),
    )
        .into_response()
}
