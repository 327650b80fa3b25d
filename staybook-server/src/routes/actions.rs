//! Owner action links from the new-request email

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info};

use staybook_core::{ApprovalNotice, BookingDetails, BookingError, BookingId, BookingResult, Decision};

use crate::html::{card_page, escape};
use crate::state::AppState;

const GREEN: &str = "#16a34a";
const RED: &str = "#dc2626";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actions/approve", get(approve))
        .route("/actions/deny", get(deny))
}

#[derive(Deserialize)]
pub struct ActionQuery {
    pub id: Option<String>,
}

/// An action that could not be carried out, rendered as a card page.
pub struct ActionError {
    status: StatusCode,
    message: String,
}

impl ActionError {
    fn bad_request(message: impl Into<String>) -> Self {
        ActionError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn from_store(decision: Decision, id: &BookingId, err: BookingError) -> Self {
        match err {
            BookingError::NotFound(_) => {
                return ActionError {
                    status: StatusCode::NOT_FOUND,
                    message: format!("Booking {} was not found.", id),
                };
            }
            BookingError::AlreadyDecided { status } => {
                info!(booking_id = %id, %status, ?decision, "refused to reverse a decision");
                return ActionError {
                    status: StatusCode::CONFLICT,
                    message: format!("{}. Its status was not changed.", err),
                };
            }
            _ => {}
        }

        let verb = match decision {
            Decision::Approve => "approve",
            Decision::Deny => "deny",
        };
        error!(booking_id = %id, %verb, error = %err, "owner action failed");
        ActionError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to {} booking. Check logs.", verb),
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let page = card_page("Something went wrong", RED, &[escape(&self.message)]);
        (self.status, Html(page)).into_response()
    }
}

fn booking_id(query: &ActionQuery) -> Result<BookingId, ActionError> {
    let raw = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ActionError::bad_request("Missing ID"))?;

    BookingId::parse(raw).map_err(|_| ActionError::bad_request("Malformed booking ID"))
}

/// GET /actions/approve?id= - Approve a booking and email the guest
async fn approve(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Result<Html<String>, ActionError> {
    let id = booking_id(&query)?;

    let guest_email = approve_and_notify(&state, &id)
        .await
        .map_err(|e| ActionError::from_store(Decision::Approve, &id, e))?;
    info!(booking_id = %id, "booking approved");

    Ok(Html(card_page(
        "Booking Approved!",
        GREEN,
        &[
            "The status has been updated to Approved.".into(),
            format!("The guest ({}) has been notified.", escape(&guest_email)),
            "You can close this window.".into(),
        ],
    )))
}

/// Apply `decision` if the booking's current status allows it.
async fn decide(state: &AppState, id: &BookingId, decision: Decision) -> BookingResult<BookingDetails> {
    let _gate = state.lock_writes().await;

    let details = state.store.booking_details(id).await?;
    decision.check_from(details.status)?;
    state.store.update_status(id, decision).await?;

    Ok(details)
}

/// Returns the address the confirmation went to.
async fn approve_and_notify(state: &AppState, id: &BookingId) -> BookingResult<String> {
    let details = decide(state, id, Decision::Approve).await?;
    let notice = ApprovalNotice::new(details.guest_name, &details.interval);
    state
        .notifier
        .send_approval_notice(&details.guest_email, &notice)
        .await?;

    Ok(details.guest_email)
}

/// GET /actions/deny?id= - Deny a booking; the guest is not emailed
async fn deny(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Result<Html<String>, ActionError> {
    let id = booking_id(&query)?;

    decide(&state, &id, Decision::Deny)
        .await
        .map_err(|e| ActionError::from_store(Decision::Deny, &id, e))?;
    info!(booking_id = %id, "booking denied");

    Ok(Html(card_page(
        "Booking Denied",
        RED,
        &[
            "The status has been updated to Denied.".into(),
            "No email has been sent to the guest automatically.".into(),
            "You can close this window.".into(),
        ],
    )))
}
