//! Application configuration management.
//!
//! Holds the base URLs of the three backend services, the live-data toggle
//! and the page size used when fetching, plus an optional pinned reference
//! date for the clock.
//!
//! Configuration is stored at `~/.config/pitchdesk/config.json`. Environment
//! variables override whatever the file says.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::filter::{Clock, FixedClock, SystemClock};
use crate::models::Domain;
use crate::utils::parse_calendar_date;

/// Application name used for config directory paths
const APP_NAME: &str = "pitchdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Rows requested per list fetch.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const ENV_USER_URL: &str = "PITCHDESK_USER_URL";
const ENV_TEAM_URL: &str = "PITCHDESK_TEAM_URL";
const ENV_RECRUIT_URL: &str = "PITCHDESK_RECRUIT_URL";
const ENV_LIVE: &str = "PITCHDESK_LIVE";
const ENV_REFERENCE_DATE: &str = "PITCHDESK_REFERENCE_DATE";
const ENV_API_TOKEN: &str = "PITCHDESK_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owns `/profiles`.
    pub user_service_url: String,
    /// Owns `/teams`.
    pub team_service_url: String,
    /// Owns `/matches`.
    pub recruit_service_url: String,
    pub use_live_data: bool,
    pub page_size: u32,
    /// Pins "today" for relative date filters. Unset means the wall clock.
    pub reference_date: Option<NaiveDate>,
    /// Bearer token sent with every backend request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Directory with `members.json`, `teams.json` and `matches.json` that
    /// replace the bundled fallback data.
    pub fallback_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_service_url: "http://localhost:8082/api".to_string(),
            team_service_url: "http://localhost:8083/api".to_string(),
            recruit_service_url: "http://localhost:8084/api".to_string(),
            use_live_data: false,
            page_size: DEFAULT_PAGE_SIZE,
            reference_date: None,
            api_token: None,
            fallback_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Base URL of the service that serves `domain`.
    pub fn service_url(&self, domain: Domain) -> &str {
        match domain {
            Domain::Members => &self.user_service_url,
            Domain::Teams => &self.team_service_url,
            Domain::Matches => &self.recruit_service_url,
        }
    }

    /// Clock for relative date filters: pinned when `reference_date` is set.
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.reference_date {
            Some(date) => Arc::new(FixedClock::on(date)),
            None => Arc::new(SystemClock),
        }
    }

    /// Apply `PITCHDESK_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_USER_URL) {
            self.user_service_url = url;
        }
        if let Some(url) = lookup(ENV_TEAM_URL) {
            self.team_service_url = url;
        }
        if let Some(url) = lookup(ENV_RECRUIT_URL) {
            self.recruit_service_url = url;
        }
        if let Some(raw) = lookup(ENV_LIVE) {
            match parse_flag(&raw) {
                Some(live) => self.use_live_data = live,
                None => warn!(value = %raw, "Ignoring unrecognised {}", ENV_LIVE),
            }
        }
        if let Some(raw) = lookup(ENV_REFERENCE_DATE) {
            match parse_calendar_date(&raw) {
                Some(date) => self.reference_date = Some(date),
                None => warn!(value = %raw, "Ignoring unparseable {}", ENV_REFERENCE_DATE),
            }
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token).filter(|t| !t.trim().is_empty());
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
