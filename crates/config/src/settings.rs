// User settings
// Loaded from ~/.config/staybook/settings.json

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Display
    #[serde(rename = "display.utcOffsetMinutes")]
    pub utc_offset_minutes: i32,

    #[serde(rename = "display.currency")]
    pub currency: String,

    // Dashboard
    #[serde(rename = "dashboard.topListings")]
    pub top_listings: usize,

    // Analytics
    #[serde(rename = "analytics.defaultPeriod")]
    pub default_period: String,

    // Charts
    #[serde(rename = "chart.width")]
    pub chart_width: f64,

    #[serde(rename = "chart.height")]
    pub chart_height: f64,

    #[serde(rename = "chart.padding")]
    pub chart_padding: f64,

    #[serde(rename = "chart.donutRadius")]
    pub donut_radius: f64,

    // Loyalty
    #[serde(rename = "loyalty.configPath")]
    pub loyalty_config_path: Option<String>, // None = built-in programme

    // Gateway
    #[serde(rename = "gateway.apiBase")]
    pub gateway_api_base: String,

    #[serde(rename = "gateway.payoutFunction")]
    pub payout_function: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            currency: "USD".into(),
            top_listings: 5,
            default_period: "6months".into(),
            chart_width: 600.0,
            chart_height: 240.0,
            chart_padding: 24.0,
            donut_radius: 60.0,
            loyalty_config_path: None,
            gateway_api_base: "https://us-central1-staybook.cloudfunctions.net".into(),
            payout_function: "createPayout".into(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Calendar buckets (this month, this year, today) use this offset from UTC
    "display.utcOffsetMinutes": 0,
    "display.currency": "USD",

    // Dashboard
    "dashboard.topListings": 5,

    // Analytics period: "6months", "12months" or "all"
    "analytics.defaultPeriod": "6months",

    // Chart geometry (SVG user units)
    "chart.width": 600,
    "chart.height": 240,
    "chart.padding": 24,
    "chart.donutRadius": 60,

    // Loyalty programme TOML (null = built-in tiers and rewards)
    "loyalty.configPath": null,

    // Callable-function gateway used for payouts
    "gateway.apiBase": "https://us-central1-staybook.cloudfunctions.net",
    "gateway.payoutFunction": "createPayout"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("staybook");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file is created with the commented
    /// defaults; an unreadable or malformed one yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            Self::create_default_file(path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io = |source| SettingsError::Io { path: path.display().to_string(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io)
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("error creating config directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            log::warn!("error writing default {}: {e}", path.display());
        }
    }

    /// The viewer's offset. Out-of-range values fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                log::warn!("display.utcOffsetMinutes {} out of range, using UTC", self.utc_offset_minutes);
                Utc.fix()
            })
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
