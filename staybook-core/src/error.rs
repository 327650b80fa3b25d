//! Error types for staybook.

use chrono::NaiveDate;
use thiserror::Error;

use crate::booking::BookingStatus;

/// Errors that can occur while handling bookings.
#[derive(Error, Debug)]
pub enum BookingError {
    /// Missing or malformed input from a guest or an action link.
    #[error("{0}")]
    Validation(String),

    /// The requested stay overlaps an approved booking.
    #[error("Dates are not available")]
    AvailabilityConflict {
        /// Id of the first approved booking found in the way.
        blocking_id: String,
    },

    #[error("Invalid interval: check-in {start} must be before check-out {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },

    #[error("Booking not found: {0}")]
    NotFound(String),

    /// The owner already approved or denied this booking the other way.
    #[error("Booking is already {}", status.as_str().to_lowercase())]
    AlreadyDecided { status: BookingStatus },

    /// The booking store or the mail transport failed.
    #[error("{operation} failed: {message}")]
    Dependency {
        operation: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BookingError::Validation(msg.into())
    }

    pub fn dependency(operation: &'static str, err: impl std::fmt::Display) -> Self {
        BookingError::Dependency {
            operation,
            message: err.to_string(),
        }
    }
}

/// Result type alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;
