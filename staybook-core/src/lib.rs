//! Core types for staybook.
//!
//! This crate holds everything that decides whether a stay can be booked,
//! with no I/O of its own:
//! - `Interval` and `Booking` for stays and their status
//! - `availability` for hard/soft blocking and the overlap check
//! - `BookingStore` and `Notifier`, the contracts the server plugs its
//!   Notion and SMTP adapters into

pub mod availability;
pub mod booking;
pub mod date;
pub mod error;
pub mod interval;
pub mod notify;
pub mod store;

pub use availability::{CalendarBlocks, check_available, classify_calendar, is_available};
pub use booking::{Booking, BookingDetails, BookingId, BookingRequest, BookingStatus, Decision, NewBooking};
pub use error::{BookingError, BookingResult};
pub use interval::{Interval, NightRange};
pub use notify::{ApprovalNotice, Notifier, SubmittedBooking};
pub use store::{BookingStore, MemoryStore};
