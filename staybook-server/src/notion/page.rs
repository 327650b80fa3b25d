//! Notion page wire format for booking records.
//!
//! The bookings database has these properties:
//! `Name` (title), `Email` (email), `Dates` (date range), `Status`
//! (select: Pending / Approved / Denied) and `Note` (rich text).

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use staybook_core::booking::DEFAULT_GUEST_NAME;
use staybook_core::date::{format_date, parse_date_prefix};
use staybook_core::{
    Booking, BookingDetails, BookingError, BookingId, BookingResult, BookingStatus, Interval, NewBooking,
};

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: PageProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageProperties {
    #[serde(rename = "Name")]
    name: Option<TitleProperty>,
    #[serde(rename = "Email")]
    email: Option<EmailProperty>,
    #[serde(rename = "Dates")]
    dates: Option<DateProperty>,
    #[serde(rename = "Status")]
    status: Option<SelectProperty>,
    #[serde(rename = "Note")]
    note: Option<RichTextProperty>,
}

#[derive(Debug, Deserialize)]
struct TitleProperty {
    #[serde(default)]
    title: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct RichTextProperty {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Deserialize)]
struct EmailProperty {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateProperty {
    date: Option<DateValue>,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectProperty {
    select: Option<SelectOption>,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

/// Response of a page create; only the id matters.
#[derive(Debug, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}

impl PageProperties {
    fn guest_name(&self) -> String {
        self.name
            .as_ref()
            .and_then(|n| n.title.first())
            .map(|t| t.plain_text.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_GUEST_NAME)
            .to_string()
    }

    fn guest_email(&self) -> Option<String> {
        self.email.as_ref().and_then(|e| e.email.clone())
    }

    fn notes(&self) -> Option<String> {
        let text: String = self
            .note
            .as_ref()?
            .rich_text
            .iter()
            .map(|t| t.plain_text.as_str())
            .collect();
        Some(text).filter(|t| !t.trim().is_empty())
    }

    fn status(&self) -> BookingStatus {
        BookingStatus::from_label(
            self.status
                .as_ref()
                .and_then(|s| s.select.as_ref())
                .map(|o| o.name.as_str()),
        )
    }

    /// The stay, or `None` when the record has no start date.
    fn interval(&self) -> Option<BookingResult<Interval>> {
        let date = self.dates.as_ref()?.date.as_ref()?;
        let start = date.start.as_deref()?;

        Some(read_interval(start, date.end.as_deref()))
    }
}

fn read_interval(start: &str, end: Option<&str>) -> BookingResult<Interval> {
    let start = parse_date_prefix(start)?;
    let end = end.map(parse_date_prefix).transpose()?;
    Interval::from_record(start, end)
}

impl Page {
    /// Read a booking from a query result. Records without dates are
    /// skipped (`None`).
    pub fn into_booking(self) -> Option<BookingResult<Booking>> {
        let interval = self.properties.interval()?;
        Some(self.read_booking(interval))
    }

    fn read_booking(self, interval: BookingResult<Interval>) -> BookingResult<Booking> {
        Ok(Booking {
            id: BookingId::parse(&self.id)?,
            guest_name: self.properties.guest_name(),
            guest_email: self.properties.guest_email().unwrap_or_default(),
            interval: interval?,
            notes: self.properties.notes(),
            status: self.properties.status(),
        })
    }

    pub fn into_details(self) -> BookingResult<BookingDetails> {
        let interval = self
            .properties
            .interval()
            .ok_or_else(|| malformed(&self.id, "no dates"))??;
        let guest_email = self
            .properties
            .guest_email()
            .ok_or_else(|| malformed(&self.id, "no email"))?;

        Ok(BookingDetails {
            guest_name: self.properties.guest_name(),
            guest_email,
            interval,
            status: self.properties.status(),
        })
    }
}

fn malformed(id: &str, what: &str) -> BookingError {
    BookingError::dependency("read booking", format!("record {} has {}", id, what))
}

/// Filter for bookings that may still occupy nights after `after`.
///
/// Notion compares a date range by its start, so stays that began up to
/// `lookback_from` are included and narrowed down by check-out afterwards.
pub fn active_filter(lookback_from: NaiveDate, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "filter": {
            "and": [
                { "property": "Status", "select": { "does_not_equal": BookingStatus::Denied.as_str() } },
                { "property": "Dates", "date": { "on_or_after": format_date(lookback_from) } },
            ]
        },
        "page_size": 100,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

pub fn create_body(database_id: &str, booking: &NewBooking) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Name": { "title": [{ "text": { "content": booking.guest_name } }] },
            "Email": { "email": booking.guest_email },
            "Dates": {
                "date": {
                    "start": format_date(booking.interval.start()),
                    "end": format_date(booking.interval.end()),
                }
            },
            "Status": { "select": { "name": BookingStatus::Pending.as_str() } },
            "Note": { "rich_text": [{ "text": { "content": booking.notes.clone().unwrap_or_default() } }] },
        }
    })
}

pub fn status_body(status: BookingStatus) -> Value {
    json!({
        "properties": {
            "Status": { "select": { "name": status.as_str() } }
        }
    })
}
