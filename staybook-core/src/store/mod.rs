//! Booking store contract.
//!
//! The store is the only source of truth for bookings. Nothing here caches
//! its state: every request reads what it needs and lets it go.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::{Booking, BookingDetails, BookingId, Decision, NewBooking};
use crate::error::BookingResult;

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Non-denied bookings that still occupy a night after `after`,
    /// i.e. whose check-out is later than `after`.
    async fn active_bookings(&self, after: NaiveDate) -> BookingResult<Vec<Booking>>;

    /// Insert a new booking. It is always recorded as pending.
    async fn create_booking(&self, booking: &NewBooking) -> BookingResult<BookingId>;

    /// Set the status of a booking, touching nothing else.
    async fn update_status(&self, id: &BookingId, decision: Decision) -> BookingResult<()>;

    async fn booking_details(&self, id: &BookingId) -> BookingResult<BookingDetails>;
}
