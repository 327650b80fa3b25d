use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use staybook_core::date::today_in;
use staybook_core::{BookingStore, MemoryStore, Notifier};

use crate::config::{AppConfig, MailBackend, PropertyConfig, StoreBackend};
use crate::mail::{LogNotifier, SmtpNotifier, Templates};
use crate::notion::NotionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub notifier: Arc<dyn Notifier>,
    pub property: Arc<PropertyConfig>,
    /// Where new requests are announced
    pub owner_email: Arc<str>,
    // Held from an availability or status check until the write lands
    write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        property: PropertyConfig,
        owner_email: &str,
    ) -> Self {
        AppState {
            store,
            notifier,
            property: Arc::new(property),
            owner_email: Arc::from(owner_email),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Build the store and notifier the config asks for.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn BookingStore> = match config.store.backend {
            StoreBackend::Notion => {
                Arc::new(NotionStore::new(&config.store).context("Failed to set up the Notion store")?)
            }
            StoreBackend::Memory => {
                warn!("using the in-memory store; bookings are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let templates = Templates::new(config.property.clone(), config.server.base_url());
        let (notifier, owner): (Arc<dyn Notifier>, &str) = match config.mail.backend {
            MailBackend::Smtp => {
                let owner = config
                    .mail
                    .owner_address()
                    .context("mail.owner or mail.username is required for the smtp backend")?;
                let notifier = SmtpNotifier::new(&config.mail, templates).context("Failed to set up SMTP")?;
                (Arc::new(notifier), owner)
            }
            MailBackend::Log => {
                let owner = config.mail.owner_address().unwrap_or("owner@localhost");
                (Arc::new(LogNotifier::new(templates)), owner)
            }
        };

        info!(
            property = %config.property.name,
            store = ?config.store.backend,
            mail = ?config.mail.backend,
            "state ready"
        );

        Ok(AppState::new(store, notifier, config.property.clone(), owner))
    }

    /// Today's date at the property.
    pub fn today(&self) -> NaiveDate {
        today_in(self.property.timezone)
    }

    /// Serialize check-then-write sequences (new requests, owner
    /// decisions) across concurrent requests.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }
}
