// SPDX-License-Identifier: MPL-2.0

use crate::config::{
    APP_ID, DEFAULT_API_BASE, FEED_PAGE_SIZE, SEARCH_DEBOUNCE, UNREAD_POLL_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistent client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: Url,
    /// Where relative media paths live. Falls back to `api_base_url`.
    pub media_base_url: Option<Url>,
    pub search_debounce_ms: u64,
    pub unread_poll_secs: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base(),
            media_base_url: None,
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            unread_poll_secs: UNREAD_POLL_INTERVAL.as_secs(),
            page_size: FEED_PAGE_SIZE,
        }
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL")
}

impl Settings {
    /// Get the settings file path (~/.config/io.github.vistagram.Client/settings.json)
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring malformed settings: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn unread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.unread_poll_secs.max(1))
    }

    /// Resolve a media path from the API (e.g. `/uploads/a.jpg`) to a full URL.
    /// Absolute URLs pass through unchanged.
    pub fn media_url(&self, path: &str) -> Option<Url> {
        if path.is_empty() {
            return None;
        }
        if let Ok(url) = Url::parse(path) {
            return Some(url);
        }

        let base = self.media_base_url.as_ref().unwrap_or(&self.api_base_url);
        let base = base.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).ok()
    }
}
