//! Availability endpoints

use axum::{Json, Router, extract::State, routing::get};

use staybook_core::availability::{AvailabilityEntry, availability_entries};
use staybook_core::{CalendarBlocks, classify_calendar};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", get(list_availability))
        .route("/calendar", get(calendar))
}

/// GET /availability - Upcoming pending and approved stays
async fn list_availability(State(state): State<AppState>) -> Result<Json<Vec<AvailabilityEntry>>, AppError> {
    let bookings = state
        .store
        .active_bookings(state.today())
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to fetch availability"))?;

    Ok(Json(availability_entries(&bookings)))
}

/// GET /calendar - Nights blocked by approved stays and flagged by pending ones
async fn calendar(State(state): State<AppState>) -> Result<Json<CalendarBlocks>, AppError> {
    let bookings = state
        .store
        .active_bookings(state.today())
        .await
        .map_err(|e| AppError::from(e).with_message("Failed to fetch availability"))?;

    Ok(Json(classify_calendar(&bookings)))
}
