pub mod actions;
pub mod availability;
pub mod book;
pub mod page;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use staybook_core::BookingError;

use crate::state::AppState;

/// All routes, with state applied
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(page::router())
        .merge(availability::router())
        .merge(book::router())
        .merge(actions::router())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors to JSON responses.
///
/// Client-facing failures (`Validation`, `AvailabilityConflict`,
/// `AlreadyDecided`) carry their own message. Anything else is logged in
/// full and answered with a generic message so store or mail internals
/// never reach the browser.
pub struct AppError {
    error: anyhow::Error,
    public_message: Option<&'static str>,
}

impl AppError {
    /// Replace the generic 500 message.
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.public_message = Some(message);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.error.downcast_ref::<BookingError>() {
            Some(BookingError::Validation(_) | BookingError::InvalidInterval { .. }) => StatusCode::BAD_REQUEST,
            Some(BookingError::AvailabilityConflict { .. } | BookingError::AlreadyDecided { .. }) => {
                StatusCode::CONFLICT
            }
            Some(BookingError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %format!("{:#}", self.error), "request failed");
            self.public_message.unwrap_or("Internal Server Error").to_string()
        } else {
            self.error.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError {
            error: err.into(),
            public_message: None,
        }
    }
}
