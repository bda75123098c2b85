//! TOML configuration for the statement viewer. Every key has a default,
//! so a partial file or no file at all still yields a working setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use cuenta_core::dates::{self, DEFAULT_LOOKBACK_DAYS};
use cuenta_core::summary::DEFAULT_CURRENCY;
use cuenta_feed::client::{
    DEFAULT_BASE_URL, DEFAULT_STATEMENT_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_UUID_PATH, FeedConfig,
};

use crate::presenter::ViewConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub feeds: FeedsSection,

    #[serde(default)]
    pub view: ViewSection,
}

/// `[feeds]`: where the statement and UUID feeds live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_statement_path")]
    pub statement_path: String,

    #[serde(default = "default_uuid_path")]
    pub uuid_path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// `[view]`: calendar and display defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSection {
    /// IANA name of the business timezone "today" is taken from.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_currency")]
    pub fallback_currency: String,

    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_statement_path() -> String {
    DEFAULT_STATEMENT_PATH.to_string()
}

fn default_uuid_path() -> String {
    DEFAULT_UUID_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_timezone() -> String {
    "America/Mexico_City".to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_lookback_days() -> i64 {
    DEFAULT_LOOKBACK_DAYS
}

impl Default for FeedsSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            statement_path: default_statement_path(),
            uuid_path: default_uuid_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            fallback_currency: default_currency(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl ViewerConfig {
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            base_url: self.feeds.base_url.clone(),
            statement_path: self.feeds.statement_path.clone(),
            uuid_path: self.feeds.uuid_path.clone(),
            timeout: Duration::from_secs(self.feeds.timeout_secs),
        }
    }

    /// Fails only on an unknown timezone name.
    pub fn view_config(&self) -> Result<ViewConfig> {
        let timezone = dates::parse_timezone(&self.view.timezone)?;
        Ok(ViewConfig {
            timezone,
            fallback_currency: self.view.fallback_currency.clone(),
            lookback_days: self.view.lookback_days,
        })
    }
}

pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    if !path.exists() {
        return Ok(ViewerConfig::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
