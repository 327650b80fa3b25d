//! Notification contract.

use async_trait::async_trait;

use crate::booking::{BookingId, NewBooking};
use crate::date::display_date;
use crate::error::BookingResult;
use crate::interval::Interval;

/// A freshly stored booking request, as the owner and guest hear about it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedBooking {
    pub id: BookingId,
    pub booking: NewBooking,
}

/// Content of the guest's approval email.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalNotice {
    pub name: String,
    pub start_display: String,
    pub end_display: String,
}

impl ApprovalNotice {
    pub fn new(name: impl Into<String>, interval: &Interval) -> Self {
        ApprovalNotice {
            name: name.into(),
            start_display: display_date(interval.start()),
            end_display: display_date(interval.end()),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the owner about a new request (with approve/deny links) and
    /// confirm receipt to the guest.
    async fn send_submission_notice(
        &self,
        owner: &str,
        guest: &str,
        submitted: &SubmittedBooking,
    ) -> BookingResult<()>;

    /// Tell the guest their stay was approved.
    async fn send_approval_notice(&self, guest: &str, notice: &ApprovalNotice) -> BookingResult<()>;
}
