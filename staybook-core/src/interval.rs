//! Stay intervals.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};

/// A stay from check-in to check-out.
///
/// Half-open: `start` is the first occupied night and `end` is the
/// check-out day, which is free for the next guest to check in.
/// Always spans at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawInterval> for Interval {
    type Error = BookingError;

    fn try_from(raw: RawInterval) -> BookingResult<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> BookingResult<Self> {
        if start >= end {
            return Err(BookingError::InvalidInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    /// A stay as the store records it. A record with no check-out date, or
    /// one that does not fall after check-in (a single blocked day entered
    /// by hand), is read as a single night.
    pub fn from_record(start: NaiveDate, end: Option<NaiveDate>) -> BookingResult<Self> {
        match end {
            Some(end) if end > start => Interval::new(start, end),
            _ => Interval::new(start, next_day(start)?),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Strict half-open overlap. Back-to-back stays do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The night before check-out.
    pub fn last_night(&self) -> NaiveDate {
        // start < end, so end has a predecessor no earlier than start
        self.end.pred_opt().unwrap_or(self.start)
    }

    /// The nights this stay occupies, as a closed range.
    pub fn occupied(&self) -> NightRange {
        NightRange {
            first: self.start,
            last: self.last_night(),
        }
    }
}

/// A closed range of occupied nights, `first..=last`.
///
/// This is what the calendar paints: a stay checking out on the 15th
/// occupies nights up to and including the 14th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NightRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl NightRange {
    pub fn contains(&self, night: NaiveDate) -> bool {
        self.first <= night && night <= self.last
    }
}

fn next_day(date: NaiveDate) -> BookingResult<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| BookingError::validation(format!("Date {} is out of range", date)))
}
