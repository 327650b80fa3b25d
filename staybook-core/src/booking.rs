//! Booking records and the guest-facing request that creates them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::parse_date;
use crate::error::{BookingError, BookingResult};
use crate::interval::Interval;

/// Where a booking stands.
///
/// Created `Pending`, then moved to `Approved` or `Denied` by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Approved,
    Denied,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Denied => "Denied",
        }
    }

    /// Read a store label. Records without a recognised status are pending.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.parse().ok())
            .unwrap_or(BookingStatus::Pending)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> BookingResult<Self> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Approved" => Ok(BookingStatus::Approved),
            "Denied" => Ok(BookingStatus::Denied),
            other => Err(BookingError::validation(format!("Unknown status '{}'", other))),
        }
    }
}

/// The owner's answer to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    pub fn status(&self) -> BookingStatus {
        match self {
            Decision::Approve => BookingStatus::Approved,
            Decision::Deny => BookingStatus::Denied,
        }
    }

    /// Check that a booking currently in `current` may take this decision.
    ///
    /// A pending booking may go either way. Repeating the decision already
    /// made is allowed; reversing it is not.
    pub fn check_from(&self, current: BookingStatus) -> BookingResult<()> {
        if current == BookingStatus::Pending || current == self.status() {
            Ok(())
        } else {
            Err(BookingError::AlreadyDecided { status: current })
        }
    }
}

/// Store identifier of a booking, always in hyphenated 8-4-4-4-12 form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingId(String);

impl BookingId {
    /// Accepts a hyphenated identifier or the bare 32-character token
    /// found in store URLs.
    pub fn parse(raw: &str) -> BookingResult<Self> {
        let raw = raw.trim();
        Uuid::parse_str(raw)
            .map(|id| BookingId(id.hyphenated().to_string()))
            .map_err(|_| BookingError::validation(format!("Malformed booking id '{}'", raw)))
    }

    pub fn generate() -> Self {
        BookingId(Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookingId {
    type Error = BookingError;

    fn try_from(raw: String) -> BookingResult<Self> {
        BookingId::parse(&raw)
    }
}

impl From<BookingId> for String {
    fn from(id: BookingId) -> Self {
        id.0
    }
}

/// A booking as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub guest_name: String,
    pub guest_email: String,
    pub interval: Interval,
    pub notes: Option<String>,
    pub status: BookingStatus,
}

/// Fields for a new booking. The store always records it as pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub guest_name: String,
    pub guest_email: String,
    pub interval: Interval,
    pub notes: Option<String>,
}

/// What an owner action needs: the current status and what the
/// confirmation email says.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub guest_name: String,
    pub guest_email: String,
    pub interval: Interval,
    pub status: BookingStatus,
}

/// Name shown for records that have none.
pub const DEFAULT_GUEST_NAME: &str = "Guest";

/// Body of a booking request as the form submits it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Check the request and turn it into a new booking.
    ///
    /// `today` is the property's current day; check-in cannot be earlier.
    pub fn validate(&self, today: NaiveDate) -> BookingResult<NewBooking> {
        let (Some(name), Some(email), Some(start), Some(end)) = (
            present(&self.name),
            present(&self.email),
            present(&self.start_date),
            present(&self.end_date),
        ) else {
            return Err(BookingError::validation("Missing required fields"));
        };

        if !looks_like_email(email) {
            return Err(BookingError::validation("Please provide a valid email address"));
        }

        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let interval = Interval::new(start, end)
            .map_err(|_| BookingError::validation("Check-out must be after check-in"))?;

        if start < today {
            return Err(BookingError::validation("Check-in cannot be in the past"));
        }

        Ok(NewBooking {
            guest_name: name.to_string(),
            guest_email: email.to_string(),
            interval,
            notes: present(&self.notes).map(str::to_string),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;

    fn request(start: &str, end: &str) -> BookingRequest {
        BookingRequest {
            name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            notes: None,
        }
    }

    fn today() -> NaiveDate {
        parse_date("2025-01-01").unwrap()
    }

    #[test]
    fn test_booking_id_normalizes_bare_token() {
        let id = BookingId::parse("1429989fe8ac4effbc8f57f56486db54").unwrap();
        assert_eq!(id.as_str(), "1429989f-e8ac-4eff-bc8f-57f56486db54");

        let same = BookingId::parse("1429989f-e8ac-4eff-bc8f-57f56486db54").unwrap();
        assert_eq!(id, same);
    }

    #[test]
    fn test_booking_id_rejects_garbage() {
        assert!(BookingId::parse("").is_err());
        assert!(BookingId::parse("not-an-id").is_err());
        assert!(BookingId::parse("1429989fe8ac4effbc8f57f56486db5").is_err());
    }

    #[test]
    fn test_status_labels() {
        for status in [BookingStatus::Pending, BookingStatus::Approved, BookingStatus::Denied] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert_eq!(BookingStatus::from_label(None), BookingStatus::Pending);
        assert_eq!(BookingStatus::from_label(Some("Maybe")), BookingStatus::Pending);
        assert_eq!(Decision::Approve.status(), BookingStatus::Approved);
        assert_eq!(Decision::Deny.status(), BookingStatus::Denied);
    }

    #[test]
    fn test_decisions_are_final() {
        for decision in [Decision::Approve, Decision::Deny] {
            assert!(decision.check_from(BookingStatus::Pending).is_ok());
            assert!(decision.check_from(decision.status()).is_ok());
        }

        let err = Decision::Approve.check_from(BookingStatus::Denied).unwrap_err();
        assert!(matches!(err, BookingError::AlreadyDecided { status: BookingStatus::Denied }));
        assert_eq!(err.to_string(), "Booking is already denied");

        assert!(Decision::Deny.check_from(BookingStatus::Approved).is_err());
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let mut req = request("2025-01-10", "2025-01-15");
        req.notes = Some("  Late arrival  ".into());
        let booking = req.validate(today()).unwrap();
        assert_eq!(booking.guest_name, "Ada Lovelace");
        assert_eq!(booking.interval.nights(), 5);
        assert_eq!(booking.notes.as_deref(), Some("Late arrival"));
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut req = request("2025-01-10", "2025-01-15");
        req.name = Some("   ".into());
        let err = req.validate(today()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");

        let err = BookingRequest::default().validate(today()).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut req = request("2025-01-10", "2025-01-15");
        req.email = Some("ada.example.com".into());
        assert!(req.validate(today()).is_err());

        assert!(request("2025-01-15", "2025-01-15").validate(today()).is_err());
        assert!(request("2025-01-15", "2025-01-10").validate(today()).is_err());
        assert!(request("2024-12-30", "2025-01-02").validate(today()).is_err());
        assert!(request("01/10/2025", "2025-01-15").validate(today()).is_err());
    }

    #[test]
    fn test_validate_rejects_datetime_strings() {
        // A UTC instant names a different calendar day east of Greenwich
        let err = request("2025-01-09T23:00:00.000Z", "2025-01-12T23:00:00.000Z")
            .validate(today())
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert!(err.to_string().contains("Expected YYYY-MM-DD"));
    }

    #[test]
    fn test_check_in_today_is_allowed() {
        assert!(request("2025-01-01", "2025-01-02").validate(today()).is_ok());
    }
}
