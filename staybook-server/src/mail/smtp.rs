//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use staybook_core::{ApprovalNotice, BookingError, BookingResult, Notifier, SubmittedBooking};

use super::templates::{Email, Templates};
use crate::config::MailConfig;

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: Templates,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig, templates: Templates) -> BookingResult<Self> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| BookingError::Config("mail.host is required for the smtp backend".into()))?;

        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| BookingError::Config(format!("Invalid SMTP host '{}': {}", host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from_address = config
            .from_address()
            .ok_or_else(|| BookingError::Config("mail.from or mail.username is required".into()))?;
        let from_address: Address = from_address
            .parse()
            .map_err(|e| BookingError::Config(format!("Invalid sender address '{}': {}", from_address, e)))?;

        Ok(SmtpNotifier {
            transport: builder.build(),
            from: Mailbox::new(Some(templates.sender_name()), from_address),
            templates,
        })
    }

    fn message(&self, to: &str, email: &Email) -> BookingResult<Message> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| BookingError::validation(format!("Invalid recipient '{}': {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| BookingError::dependency("build email", e))
    }

    async fn deliver(&self, to: &str, email: &Email) -> BookingResult<()> {
        let message = self.message(to, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| BookingError::dependency("send email", e))?;
        info!(to, subject = %email.subject, "email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_submission_notice(
        &self,
        owner: &str,
        guest: &str,
        submitted: &SubmittedBooking,
    ) -> BookingResult<()> {
        let owner_email = self.templates.owner_notice(submitted);
        let guest_email = self.templates.guest_receipt(submitted);

        tokio::try_join!(self.deliver(owner, &owner_email), self.deliver(guest, &guest_email))?;
        Ok(())
    }

    async fn send_approval_notice(&self, guest: &str, notice: &ApprovalNotice) -> BookingResult<()> {
        self.deliver(guest, &self.templates.approval(notice)).await
    }
}
