//! Booking store backed by a Notion database.

mod page;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use staybook_core::{
    Booking, BookingDetails, BookingError, BookingId, BookingResult, BookingStatus, BookingStore, Decision,
    NewBooking,
};

use crate::config::StoreConfig;
use page::{CreatedPage, Page, QueryResponse};

pub struct NotionStore {
    client: Client,
    api_base: String,
    api_key: String,
    database_id: String,
    version: String,
    lookback_days: u32,
}

impl NotionStore {
    pub fn new(config: &StoreConfig) -> BookingResult<Self> {
        let api_key = config
            .notion_api_key
            .clone()
            .ok_or_else(|| BookingError::Config("store.notion_api_key is required for the notion backend".into()))?;
        let database_id = config
            .notion_database_id
            .as_deref()
            .ok_or_else(|| BookingError::Config("store.notion_database_id is required for the notion backend".into()))?;
        // Database ids are copied out of Notion URLs without hyphens
        let database_id = BookingId::parse(database_id)
            .map_err(|_| BookingError::Config(format!("Malformed Notion database id '{}'", database_id)))?
            .to_string();

        Ok(NotionStore {
            client: Client::new(),
            api_base: config.notion_api_base.trim_end_matches('/').to_string(),
            api_key,
            database_id,
            version: config.notion_version.clone(),
            lookback_days: config.lookback_days,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/v1/{}", self.api_base, path))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version)
    }

    /// Send a request and decode the JSON response.
    ///
    /// `page` names the booking a 404 refers to; without it a 404 is just
    /// another failure.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        page: Option<&BookingId>,
        request: RequestBuilder,
    ) -> BookingResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| BookingError::dependency(operation, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND
            && let Some(id) = page
        {
            return Err(BookingError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation, %status, body = %body, "Notion API error");
            return Err(BookingError::dependency(operation, format!("Notion API returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| BookingError::dependency(operation, e))
    }
}

/// Read the bookings out of one page of query results.
///
/// A record that cannot be read is logged and left out, so one bad row
/// does not take down availability for every other stay.
fn read_results(results: Vec<Page>) -> Vec<Booking> {
    let mut bookings = Vec::with_capacity(results.len());
    for result in results {
        let page_id = result.id.clone();
        match result.into_booking() {
            Some(Ok(booking)) => bookings.push(booking),
            Some(Err(e)) => warn!(page_id = %page_id, error = %e, "skipping unreadable booking record"),
            None => debug!(page_id = %page_id, "skipping booking record without dates"),
        }
    }
    bookings
}

#[async_trait]
impl BookingStore for NotionStore {
    async fn active_bookings(&self, after: NaiveDate) -> BookingResult<Vec<Booking>> {
        let lookback_from = after
            .checked_sub_days(Days::new(self.lookback_days.into()))
            .unwrap_or(after);
        let path = format!("databases/{}/query", self.database_id);

        let mut bookings = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let body = page::active_filter(lookback_from, cursor.as_deref());
            let response: QueryResponse = self
                .execute("query bookings", None, self.request(Method::POST, &path).json(&body))
                .await?;

            bookings.extend(read_results(response.results));

            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }

        bookings.retain(|b| b.status != BookingStatus::Denied && b.interval.end() > after);
        for booking in bookings.iter().filter(|b| b.interval.start() == lookback_from) {
            warn!(
                booking_id = %booking.id,
                lookback_days = self.lookback_days,
                "stay starts at the edge of the lookback window; longer stays may be missed"
            );
        }
        debug!(count = bookings.len(), %after, "fetched active bookings");

        Ok(bookings)
    }

    async fn create_booking(&self, booking: &NewBooking) -> BookingResult<BookingId> {
        let body = page::create_body(&self.database_id, booking);
        let created: CreatedPage = self
            .execute("create booking", None, self.request(Method::POST, "pages").json(&body))
            .await?;

        BookingId::parse(&created.id)
    }

    async fn update_status(&self, id: &BookingId, decision: Decision) -> BookingResult<()> {
        let body = page::status_body(decision.status());
        let _: IgnoredAny = self
            .execute(
                "update status",
                Some(id),
                self.request(Method::PATCH, &format!("pages/{}", id)).json(&body),
            )
            .await?;

        Ok(())
    }

    async fn booking_details(&self, id: &BookingId) -> BookingResult<BookingDetails> {
        let page: Page = self
            .execute("get booking", Some(id), self.request(Method::GET, &format!("pages/{}", id)))
            .await?;

        page.into_details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_config() -> StoreConfig {
        StoreConfig {
            notion_api_key: Some("secret_abc".into()),
            notion_database_id: Some("a1b2c3d4e5f60718293a4b5c6d7e8f90".into()),
            notion_api_base: "https://notion.example.com/".into(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_new_normalizes_database_id() {
        let store = NotionStore::new(&store_config()).unwrap();
        assert_eq!(store.database_id, "a1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90");
        assert_eq!(store.api_base, "https://notion.example.com");
    }

    #[test]
    fn test_new_requires_credentials() {
        let mut config = store_config();
        config.notion_api_key = None;
        assert!(matches!(NotionStore::new(&config), Err(BookingError::Config(_))));

        let mut config = store_config();
        config.notion_database_id = Some("not a database".into());
        assert!(matches!(NotionStore::new(&config), Err(BookingError::Config(_))));
    }

    #[test]
    fn test_one_bad_record_does_not_fail_the_query() {
        let response: QueryResponse = serde_json::from_value(serde_json::json!({
            "results": [
                {
                    "id": "1429989f-e8ac-4eff-bc8f-57f56486db54",
                    "properties": {
                        "Dates": { "date": { "start": "2025-03-01", "end": "2025-03-04" } },
                        "Status": { "select": { "name": "Approved" } }
                    }
                },
                {
                    "id": "not-a-page-id",
                    "properties": { "Dates": { "date": { "start": "2025-03-10", "end": "2025-03-12" } } }
                },
                {
                    "id": "a1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90",
                    "properties": { "Dates": { "date": { "start": "2025-03-20", "end": "2025-03-20" } } }
                },
                { "id": "b1b2c3d4-e5f6-0718-293a-4b5c6d7e8f90", "properties": {} }
            ],
            "has_more": false,
            "next_cursor": null
        }))
        .unwrap();

        let bookings = read_results(response.results);
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].status, BookingStatus::Approved);
        assert_eq!(bookings[1].interval.nights(), 1);
    }

    #[test]
    fn test_requests_carry_auth_and_version() {
        let store = NotionStore::new(&store_config()).unwrap();
        let request = store.request(Method::GET, "pages/abc").build().unwrap();

        assert_eq!(request.url().as_str(), "https://notion.example.com/v1/pages/abc");
        assert_eq!(request.headers()["Notion-Version"], "2022-06-28");
        assert_eq!(request.headers()["Authorization"], "Bearer secret_abc");
    }
}
