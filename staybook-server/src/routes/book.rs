//! Booking request endpoint

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Serialize;
use tracing::{error, info, warn};

use staybook_core::{BookingError, BookingRequest, SubmittedBooking, check_available};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/book", post(book))
}

#[derive(Serialize)]
pub struct BookResponse {
    pub success: bool,
}

/// POST /book - Request a stay
///
/// The request is stored as pending once it clears validation and no
/// approved stay overlaps it. Emails go out afterwards and never undo an
/// accepted request.
async fn book(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "unreadable booking request");
        BookingError::validation("Missing required fields")
    })?;

    let booking = request.validate(state.today())?;

    let id = {
        let _gate = state.lock_writes().await;

        let existing = state.store.active_bookings(state.today()).await?;
        if let Err(e) = check_available(&booking.interval, &existing) {
            info!(
                start = %booking.interval.start(),
                end = %booking.interval.end(),
                error = ?e,
                "booking request rejected"
            );
            return Err(e.into());
        }

        state.store.create_booking(&booking).await?
    };
    info!(booking_id = %id, nights = booking.interval.nights(), "booking request stored");

    let submitted = SubmittedBooking { id, booking };
    if let Err(e) = state
        .notifier
        .send_submission_notice(&state.owner_email, &submitted.booking.guest_email, &submitted)
        .await
    {
        error!(booking_id = %submitted.id, error = %e, "failed to send booking request emails");
    }

    Ok(Json(BookResponse { success: true }))
}
