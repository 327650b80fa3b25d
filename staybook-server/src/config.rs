//! Server configuration.
//!
//! Read from `~/.config/staybook/config.toml` (or `--config`), then
//! overridden by `STAYBOOK_<SECTION>__<KEY>` environment variables, e.g.
//! `STAYBOOK_STORE__NOTION_API_KEY`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub property: PropertyConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Public URL used in emailed action links.
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1".into(),
            port: 3000,
            base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

/// The rental itself, as shown on pages and in emails.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    pub name: String,
    pub location: String,
    pub address: String,
    pub hosts: String,
    /// Timezone that decides what "today" is at the property.
    pub timezone: Tz,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        PropertyConfig {
            name: "Alpine Sanctuary".into(),
            location: "Revelstoke, BC".into(),
            address: "24-414 Humbert Street, Revelstoke, BC".into(),
            hosts: "Liam & Lauren".into(),
            timezone: chrono_tz::America::Vancouver,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Notion,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub notion_api_key: Option<String>,
    pub notion_database_id: Option<String>,
    pub notion_api_base: String,
    pub notion_version: String,
    /// How far back to look for stays that began before today but have
    /// not checked out yet. Notion filters a date range by its start, so a
    /// stay that began longer ago than this stops blocking its remaining
    /// nights. Set it above the longest stay the property accepts.
    pub lookback_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::default(),
            notion_api_key: None,
            notion_database_id: None,
            notion_api_base: "https://api.notion.com".into(),
            notion_version: "2022-06-28".into(),
            lookback_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    #[default]
    Smtp,
    Log,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub host: Option<String>,
    pub port: u16,
    /// STARTTLS. Turn off only for local mail catchers.
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    /// Where new requests are announced. Defaults to the SMTP username.
    pub owner: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            backend: MailBackend::default(),
            host: None,
            port: 587,
            tls: true,
            username: None,
            password: None,
            from: None,
            owner: None,
        }
    }
}

impl MailConfig {
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }

    pub fn owner_address(&self) -> Option<&str> {
        self.owner.as_deref().or(self.username.as_deref())
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("staybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (optional) and apply environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(shellexpand::tilde(p).as_ref()),
            None => Self::default_path()?,
        };

        let builder = Config::builder()
            .add_source(File::from(path.as_path()).required(false))
            .add_source(
                Environment::with_prefix("STAYBOOK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder).with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
