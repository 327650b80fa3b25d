//! In-memory booking store for development and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::booking::{Booking, BookingDetails, BookingId, BookingStatus, Decision, NewBooking};
use crate::error::{BookingError, BookingResult};
use crate::store::BookingStore;

/// A [`BookingStore`] that keeps bookings in process memory.
///
/// Can be switched offline, after which every call fails the way an
/// unreachable remote store would.
#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<Vec<Booking>>,
    offline: AtomicBool,
    status_updates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        MemoryStore {
            bookings: RwLock::new(bookings),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful status updates so far.
    pub fn status_updates(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }

    /// Snapshot of every booking, denied ones included.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    fn ensure_online(&self, operation: &'static str) -> BookingResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BookingError::dependency(operation, "store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn active_bookings(&self, after: NaiveDate) -> BookingResult<Vec<Booking>> {
        self.ensure_online("query bookings")?;

        let mut active: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.status != BookingStatus::Denied && b.interval.end() > after)
            .cloned()
            .collect();
        active.sort_by_key(|b| b.interval.start());

        Ok(active)
    }

    async fn create_booking(&self, booking: &NewBooking) -> BookingResult<BookingId> {
        self.ensure_online("create booking")?;

        let id = BookingId::generate();
        self.bookings.write().await.push(Booking {
            id: id.clone(),
            guest_name: booking.guest_name.clone(),
            guest_email: booking.guest_email.clone(),
            interval: booking.interval,
            notes: booking.notes.clone(),
            status: BookingStatus::Pending,
        });

        Ok(id)
    }

    async fn update_status(&self, id: &BookingId, decision: Decision) -> BookingResult<()> {
        self.ensure_online("update status")?;

        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        booking.status = decision.status();
        self.status_updates.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn booking_details(&self, id: &BookingId) -> BookingResult<BookingDetails> {
        self.ensure_online("get booking")?;

        self.bookings
            .read()
            .await
            .iter()
            .find(|b| &b.id == id)
            .map(|b| BookingDetails {
                guest_name: b.guest_name.clone(),
                guest_email: b.guest_email.clone(),
                interval: b.interval,
                status: b.status,
            })
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use crate::interval::Interval;

    fn new_booking(start: &str, end: &str) -> NewBooking {
        NewBooking {
            guest_name: "Ada".into(),
            guest_email: "ada@example.com".into(),
            interval: Interval::new(parse_date(start).unwrap(), parse_date(end).unwrap()).unwrap(),
            notes: Some("Bringing skis".into()),
        }
    }

    #[tokio::test]
    async fn test_created_bookings_are_pending() {
        let store = MemoryStore::new();
        let id = store.create_booking(&new_booking("2025-01-10", "2025-01-12")).await.unwrap();

        let bookings = store.bookings().await;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, id);
        assert_eq!(bookings[0].status, BookingStatus::Pending);
        assert_eq!(bookings[0].notes.as_deref(), Some("Bringing skis"));
    }

    #[tokio::test]
    async fn test_active_bookings_skip_denied_and_past() {
        let store = MemoryStore::new();
        let past = store.create_booking(&new_booking("2025-01-01", "2025-01-05")).await.unwrap();
        let ongoing = store.create_booking(&new_booking("2025-01-08", "2025-01-12")).await.unwrap();
        let denied = store.create_booking(&new_booking("2025-02-01", "2025-02-03")).await.unwrap();
        store.update_status(&denied, Decision::Deny).await.unwrap();

        let active = store.active_bookings(parse_date("2025-01-10").unwrap()).await.unwrap();
        let ids: Vec<_> = active.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec![ongoing]);
        assert!(!ids.contains(&past));
    }

    #[tokio::test]
    async fn test_update_status_counts_and_details() {
        let store = MemoryStore::new();
        let id = store.create_booking(&new_booking("2025-01-10", "2025-01-12")).await.unwrap();

        store.update_status(&id, Decision::Approve).await.unwrap();
        assert_eq!(store.status_updates(), 1);
        assert_eq!(store.bookings().await[0].status, BookingStatus::Approved);

        let details = store.booking_details(&id).await.unwrap();
        assert_eq!(details.guest_email, "ada@example.com");
        assert_eq!(details.interval.nights(), 2);
        assert_eq!(details.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let id = BookingId::generate();
        assert!(matches!(
            store.update_status(&id, Decision::Approve).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(store.booking_details(&id).await, Err(BookingError::NotFound(_))));
        assert_eq!(store.status_updates(), 0);
    }

    #[tokio::test]
    async fn test_offline_store_fails_without_writing() {
        let store = MemoryStore::new();
        store.set_offline(true);

        let err = store.create_booking(&new_booking("2025-01-10", "2025-01-12")).await.unwrap_err();
        assert!(matches!(err, BookingError::Dependency { .. }));
        assert!(store.active_bookings(parse_date("2025-01-01").unwrap()).await.is_err());

        store.set_offline(false);
        assert!(store.bookings().await.is_empty());
    }
}
