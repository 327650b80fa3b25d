//! Outgoing email.
//!
//! `SmtpNotifier` delivers for real; `LogNotifier` only logs what would have
//! been sent, including the approve/deny links, for local development.

mod smtp;
mod templates;

pub use smtp::SmtpNotifier;
pub use templates::Templates;

use async_trait::async_trait;
use tracing::info;

use staybook_core::{ApprovalNotice, BookingResult, Notifier, SubmittedBooking};

pub struct LogNotifier {
    templates: Templates,
}

impl LogNotifier {
    pub fn new(templates: Templates) -> Self {
        LogNotifier { templates }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_submission_notice(
        &self,
        owner: &str,
        guest: &str,
        submitted: &SubmittedBooking,
    ) -> BookingResult<()> {
        let owner_email = self.templates.owner_notice(submitted);
        let guest_email = self.templates.guest_receipt(submitted);

        info!(
            to = owner,
            subject = %owner_email.subject,
            approve = %self.templates.approve_url(&submitted.id),
            deny = %self.templates.deny_url(&submitted.id),
            "email not sent (log backend)"
        );
        info!(to = guest, subject = %guest_email.subject, "email not sent (log backend)");
        Ok(())
    }

    async fn send_approval_notice(&self, guest: &str, notice: &ApprovalNotice) -> BookingResult<()> {
        let email = self.templates.approval(notice);
        info!(to = guest, subject = %email.subject, "email not sent (log backend)");
        Ok(())
    }
}
