//! HTML email templates.

use chrono::{Datelike, Utc};

use staybook_core::date::display_date;
use staybook_core::{ApprovalNotice, BookingId, SubmittedBooking};

use crate::config::PropertyConfig;
use crate::html::escape;

/// A rendered email, ready to address.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub subject: String,
    pub html: String,
}

/// Renders the emails for one property.
#[derive(Debug, Clone)]
pub struct Templates {
    property: PropertyConfig,
    base_url: String,
}

impl Templates {
    pub fn new(property: PropertyConfig, base_url: impl Into<String>) -> Self {
        Templates {
            property,
            base_url: base_url.into(),
        }
    }

    pub fn sender_name(&self) -> String {
        format!("{} Booking", self.property.name)
    }

    pub fn approve_url(&self, id: &BookingId) -> String {
        format!("{}/actions/approve?id={}", self.base_url, id)
    }

    pub fn deny_url(&self, id: &BookingId) -> String {
        format!("{}/actions/deny?id={}", self.base_url, id)
    }

    fn directions_url(&self) -> String {
        reqwest::Url::parse_with_params("https://maps.google.com/", &[("q", self.property.address.as_str())])
            .map(|url| url.to_string())
            .unwrap_or_else(|_| "https://maps.google.com/".to_string())
    }

    /// New request, sent to the owner with approve/deny links.
    pub fn owner_notice(&self, submitted: &SubmittedBooking) -> Email {
        let booking = &submitted.booking;
        let check_in = display_date(booking.interval.start());
        let check_out = display_date(booking.interval.end());
        let name = escape(&booking.guest_name);
        let email = escape(&booking.guest_email);
        let notes = booking.notes.as_deref().map(escape).unwrap_or_else(|| "None".into());

        let content = format!(
            r#"
      <h2>New Booking Request</h2>
      <p>You have received a new booking request. Details below:</p>

      <div style="background: #fcfaf8; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <div class="info-row"><span class="info-label">Guest</span> <span class="info-value">{name}</span></div>
        <div class="info-row"><span class="info-label">Email</span> <span class="info-value"><a href="mailto:{email}">{email}</a></span></div>
        <div class="info-row"><span class="info-label">Check-in</span> <span class="info-value">{check_in}</span></div>
        <div class="info-row"><span class="info-label">Check-out</span> <span class="info-value">{check_out}</span></div>
        <div class="info-row" style="border: none;"><span class="info-label">Notes</span> <span class="info-value">{notes}</span></div>
      </div>

      <p>Please approve or deny this request:</p>
      <div style="margin-top: 20px;">
        <a href="{approve}" class="button" style="color:#ffffff;">Approve Request</a>
        <a href="{deny}" class="button button--outline">Deny</a>
      </div>
"#,
            approve = self.approve_url(&submitted.id),
            deny = self.deny_url(&submitted.id),
        );

        Email {
            subject: format!("New Request: {} ({})", booking.guest_name, check_in),
            html: self.layout(&content),
        }
    }

    /// Receipt for the guest.
    pub fn guest_receipt(&self, submitted: &SubmittedBooking) -> Email {
        let booking = &submitted.booking;
        let content = format!(
            r#"
      <h2>Request Received</h2>
      <p>Hi {name},</p>
      <p>Thanks for your interest in staying at {property}.</p>
      <p>We've received your request for <strong>{check_in}</strong> to <strong>{check_out}</strong>.</p>
      <p>We will review it and get back to you shortly with a confirmation.</p>
      <div class="divider"></div>
      <p style="font-size: 14px; color: #78716c;">If you have any questions, feel free to reply to this email.</p>
"#,
            name = escape(&booking.guest_name),
            property = escape(&self.property.name),
            check_in = display_date(booking.interval.start()),
            check_out = display_date(booking.interval.end()),
        );

        Email {
            subject: format!("Booking Request Received - {}", self.property.location),
            html: self.layout(&content),
        }
    }

    /// Confirmation for the guest once the owner approves.
    pub fn approval(&self, notice: &ApprovalNotice) -> Email {
        let content = format!(
            r#"
      <h2>Booking Confirmed!</h2>
      <p>Hi {name},</p>
      <p>Great news! Your stay at {property} has been <strong>approved</strong>.</p>
      <p><strong>Dates:</strong> {start} - {end}</p>
      <p>You are all set. We will send you check-in instructions closer to your arrival date.</p>
      <a href="{directions}" class="button" style="color:white">Get Directions</a>
"#,
            name = escape(&notice.name),
            property = escape(&self.property.name),
            start = escape(&notice.start_display),
            end = escape(&notice.end_display),
            directions = escape(&self.directions_url()),
        );

        Email {
            subject: format!("Booking Confirmed! - {}", self.property.location),
            html: self.layout(&content),
        }
    }

    fn layout(&self, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body {{ font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; background-color: #fcfaf8; color: #1c1917; margin: 0; padding: 0; }}
      .container {{ max-width: 600px; margin: 40px auto; background: #ffffff; padding: 40px; border-radius: 12px; border: 1px solid #e7e5e4; }}
      .header {{ text-align: center; margin-bottom: 30px; letter-spacing: 0.1em; text-transform: uppercase; font-size: 14px; color: #78716c; font-weight: 600; }}
      .logo {{ font-size: 24px; font-weight: bold; color: #1c1917; text-decoration: none; display: block; margin-bottom: 8px; letter-spacing: -0.02em; }}
      .content {{ line-height: 1.6; font-size: 16px; color: #44403c; }}
      .button {{ display: inline-block; padding: 12px 24px; background-color: #171717; color: #ffffff !important; text-decoration: none; border-radius: 6px; font-weight: 600; font-size: 14px; margin-top: 20px; text-align: center; }}
      .button--outline {{ background-color: transparent; border: 1px solid #d6d3d1; color: #171717 !important; margin-left: 10px; }}
      .divider {{ border-top: 1px solid #f5f5f4; margin: 30px 0; }}
      .footer {{ text-align: center; margin-top: 40px; font-size: 12px; color: #a8a29e; }}
      h2 {{ font-size: 20px; font-weight: 600; color: #1c1917; margin-top: 0; }}
      .info-row {{ display: flex; justify-content: space-between; margin-bottom: 12px; border-bottom: 1px solid #f5f5f4; padding-bottom: 12px; }}
      .info-label {{ font-weight: 600; color: #78716c; font-size: 14px; }}
      .info-value {{ font-weight: 400; color: #1c1917; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <span class="logo">{name}</span>
        {location}
      </div>
      <div class="content">
        {content}
      </div>
      <div class="footer">
        &copy; {year} {hosts}. {address}.
      </div>
    </div>
  </body>
</html>"#,
            name = escape(&self.property.name),
            location = escape(&self.property.location),
            year = Utc::now().year(),
            hosts = escape(&self.property.hosts),
            address = escape(&self.property.address),
        )
    }
}
