use crate::core::error::{BookingError, StorageError};
use crate::core::state::AppState;
use crate::models::api::{BookingsResponse, SuccessResponse};
use crate::models::booking::{Booking, BookingRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Bookings made in this session
///
/// GET /bookings
pub async fn list_bookings_handler(State(state): State<Arc<AppState>>) -> Json<BookingsResponse> {
    Json(BookingsResponse {
        success: true,
        bookings: state.session().bookings().to_vec(),
    })
}

/// Book a class against the membership
///
/// POST /bookings
pub async fn book_class_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    if state.catalog.find_class(&request.class_name).is_none() {
        debug!(class = %request.class_name, "Booking for a class outside the catalog");
    }

    let booking = state.session().book_class(request)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Cancel a booking. Unknown ids succeed without changing anything.
///
/// DELETE /bookings/{id}
pub async fn cancel_booking_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, StorageError> {
    let cancelled = state.session().cancel_booking(&id)?;

    let message = match cancelled {
        Some(booking) => format!("Booking {} cancelled", booking.id),
        None => format!("No booking {}", id),
    };

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message,
        }),
    )
        .into_response())
}
