//! Availability and calendar blocking.
//!
//! One set of rules decides both whether a stay can be requested and how the
//! calendar is painted:
//! - `Approved` bookings are hard blocks. Nothing may overlap them.
//! - `Pending` bookings are soft blocks. They are flagged but can be
//!   requested over.
//! - `Denied` bookings are ignored, even if a caller forgot to filter them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::booking::{Booking, BookingStatus};
use crate::date::format_date;
use crate::error::{BookingError, BookingResult};
use crate::interval::{Interval, NightRange};

/// Whether `candidate` can be requested given `existing` bookings.
pub fn is_available(candidate: &Interval, existing: &[Booking]) -> bool {
    first_conflict(candidate, existing).is_none()
}

/// Like [`is_available`], but reports which booking is in the way.
pub fn check_available(candidate: &Interval, existing: &[Booking]) -> BookingResult<()> {
    match first_conflict(candidate, existing) {
        Some(blocking) => Err(BookingError::AvailabilityConflict {
            blocking_id: blocking.id.to_string(),
        }),
        None => Ok(()),
    }
}

/// The first approved booking that overlaps `candidate`.
pub fn first_conflict<'a>(candidate: &Interval, existing: &'a [Booking]) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.status == BookingStatus::Approved)
        .find(|b| b.interval.overlaps(candidate))
}

/// Occupied nights split by how strongly they block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarBlocks {
    /// Approved stays. These nights cannot be selected.
    pub hard_blocks: Vec<NightRange>,
    /// Pending stays. Shown as a warning, still selectable.
    pub soft_blocks: Vec<NightRange>,
}

impl CalendarBlocks {
    pub fn is_hard_blocked(&self, night: NaiveDate) -> bool {
        self.hard_blocks.iter().any(|r| r.contains(night))
    }

    pub fn is_soft_blocked(&self, night: NaiveDate) -> bool {
        self.soft_blocks.iter().any(|r| r.contains(night))
    }

    /// An approved stay starts on `night` and no other approved stay covers
    /// it, so the day still works as a check-out.
    pub fn is_turnover(&self, night: NaiveDate) -> bool {
        self.hard_blocks.iter().any(|r| r.first == night)
            && !self.hard_blocks.iter().any(|r| r.first < night && r.contains(night))
    }
}

/// Partition bookings into hard and soft blocks for the calendar.
pub fn classify_calendar(existing: &[Booking]) -> CalendarBlocks {
    let mut blocks = CalendarBlocks::default();

    for booking in existing {
        let nights = booking.interval.occupied();
        match booking.status {
            BookingStatus::Approved => blocks.hard_blocks.push(nights),
            BookingStatus::Pending => blocks.soft_blocks.push(nights),
            BookingStatus::Denied => {}
        }
    }

    blocks
}

/// One row of the public availability feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityEntry {
    pub start: String,
    pub end: String,
    pub status: BookingStatus,
}

/// The availability feed: every blocking booking with date-only bounds.
pub fn availability_entries(existing: &[Booking]) -> Vec<AvailabilityEntry> {
    existing
        .iter()
        .filter(|b| b.status != BookingStatus::Denied)
        .map(|b| AvailabilityEntry {
            start: format_date(b.interval.start()),
            end: format_date(b.interval.end()),
            status: b.status,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingId;
    use crate::date::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn iv(start: &str, end: &str) -> Interval {
        Interval::new(d(start), d(end)).unwrap()
    }

    fn booking(start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::generate(),
            guest_name: "Guest".into(),
            guest_email: "guest@example.com".into(),
            interval: iv(start, end),
            notes: None,
            status,
        }
    }

    #[test]
    fn test_no_bookings_is_always_available() {
        assert!(is_available(&iv("2025-01-10", "2025-01-15"), &[]));
        assert!(is_available(&iv("1999-12-31", "2000-01-01"), &[]));
    }

    #[test]
    fn test_approved_scenario() {
        let existing = vec![booking("2025-01-10", "2025-01-15", BookingStatus::Approved)];

        assert!(!is_available(&iv("2025-01-12", "2025-01-14"), &existing));
        assert!(is_available(&iv("2025-01-15", "2025-01-18"), &existing));
        assert!(is_available(&iv("2025-01-05", "2025-01-10"), &existing));
    }

    #[test]
    fn test_identical_interval_depends_on_status() {
        let approved = vec![booking("2025-03-01", "2025-03-04", BookingStatus::Approved)];
        let pending = vec![booking("2025-03-01", "2025-03-04", BookingStatus::Pending)];
        let candidate = iv("2025-03-01", "2025-03-04");

        assert!(!is_available(&candidate, &approved));
        assert!(is_available(&candidate, &pending));
    }

    #[test]
    fn test_containment_and_partial_overlap_rejected() {
        let existing = vec![booking("2025-01-10", "2025-01-15", BookingStatus::Approved)];
        for (start, end) in [
            ("2025-01-08", "2025-01-20"),
            ("2025-01-11", "2025-01-12"),
            ("2025-01-14", "2025-01-16"),
            ("2025-01-09", "2025-01-11"),
        ] {
            assert!(!is_available(&iv(start, end), &existing), "{start}..{end}");
        }
    }

    #[test]
    fn test_any_of_several_approved_blocks() {
        let existing = vec![
            booking("2025-01-01", "2025-01-03", BookingStatus::Approved),
            booking("2025-01-20", "2025-01-25", BookingStatus::Approved),
            booking("2025-02-10", "2025-02-12", BookingStatus::Approved),
        ];
        assert!(!is_available(&iv("2025-02-11", "2025-02-13"), &existing));
        assert!(!is_available(&iv("2024-12-30", "2025-01-02"), &existing));
        assert!(is_available(&iv("2025-01-03", "2025-01-20"), &existing));
    }

    #[test]
    fn test_denied_never_blocks() {
        let existing = vec![
            booking("2025-01-10", "2025-01-15", BookingStatus::Denied),
            booking("2025-01-01", "2025-12-31", BookingStatus::Denied),
        ];
        assert!(is_available(&iv("2025-01-12", "2025-01-14"), &existing));
        assert_eq!(classify_calendar(&existing), CalendarBlocks::default());
        assert!(availability_entries(&existing).is_empty());
    }

    #[test]
    fn test_check_available_names_blocking_booking() {
        let blocker = booking("2025-01-10", "2025-01-15", BookingStatus::Approved);
        let existing = vec![
            booking("2025-01-10", "2025-01-15", BookingStatus::Pending),
            blocker.clone(),
        ];
        match check_available(&iv("2025-01-12", "2025-01-13"), &existing) {
            Err(BookingError::AvailabilityConflict { blocking_id }) => {
                assert_eq!(blocking_id, blocker.id.to_string());
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(check_available(&iv("2025-01-15", "2025-01-16"), &existing).is_ok());
    }

    #[test]
    fn test_pending_scenario() {
        let existing = vec![booking("2025-02-01", "2025-02-05", BookingStatus::Pending)];

        assert!(is_available(&iv("2025-02-02", "2025-02-04"), &existing));

        let blocks = classify_calendar(&existing);
        assert!(blocks.hard_blocks.is_empty());
        assert_eq!(
            blocks.soft_blocks,
            vec![NightRange {
                first: d("2025-02-01"),
                last: d("2025-02-04"),
            }]
        );
        assert!(blocks.is_soft_blocked(d("2025-02-04")));
        assert!(!blocks.is_soft_blocked(d("2025-02-05")));
    }

    #[test]
    fn test_classify_partitions_by_status() {
        let existing = vec![
            booking("2025-01-10", "2025-01-15", BookingStatus::Approved),
            booking("2025-01-15", "2025-01-16", BookingStatus::Pending),
            booking("2025-01-20", "2025-01-22", BookingStatus::Denied),
        ];
        let blocks = classify_calendar(&existing);

        assert_eq!(blocks.hard_blocks.len(), 1);
        assert_eq!(blocks.soft_blocks.len(), 1);
        assert!(blocks.is_hard_blocked(d("2025-01-14")));
        assert!(!blocks.is_hard_blocked(d("2025-01-15")));
        assert!(blocks.is_soft_blocked(d("2025-01-15")));
        assert!(!blocks.is_soft_blocked(d("2025-01-21")));
    }

    #[test]
    fn test_turnover_is_the_first_approved_night() {
        let existing = vec![
            booking("2025-01-10", "2025-01-13", BookingStatus::Approved),
            booking("2025-01-11", "2025-01-12", BookingStatus::Approved),
            booking("2025-01-20", "2025-01-22", BookingStatus::Pending),
        ];
        let blocks = classify_calendar(&existing);

        assert!(blocks.is_turnover(d("2025-01-10")));
        // Covered by the stay that began the day before
        assert!(!blocks.is_turnover(d("2025-01-11")));
        assert!(!blocks.is_turnover(d("2025-01-12")));
        assert!(!blocks.is_turnover(d("2025-01-20")));
    }

    #[test]
    fn test_availability_entries_use_date_only_strings() {
        let existing = vec![
            booking("2025-01-10", "2025-01-15", BookingStatus::Approved),
            booking("2025-02-01", "2025-02-05", BookingStatus::Pending),
        ];
        let json = serde_json::to_value(availability_entries(&existing)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"start": "2025-01-10", "end": "2025-01-15", "status": "Approved"},
                {"start": "2025-02-01", "end": "2025-02-05", "status": "Pending"},
            ])
        );
    }

    #[test]
    fn test_calendar_blocks_serialize_camel_case() {
        let existing = vec![booking("2025-01-10", "2025-01-12", BookingStatus::Approved)];
        let json = serde_json::to_value(classify_calendar(&existing)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hardBlocks": [{"first": "2025-01-10", "last": "2025-01-11"}],
                "softBlocks": [],
            })
        );
    }
}
