//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_MA_WINDOW, DEFAULT_POLL_SECS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    /// Symbol selected when the app last closed
    pub last_symbol: Option<String>,

    /// Simple moving average window in days
    pub ma_window: usize,

    /// Visible chart span key ("1y" | "6mo" | "3mo" | "1mo")
    pub chart_range: String,

    /// Live watch poll interval in seconds
    pub poll_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            last_symbol: None,
            ma_window: DEFAULT_MA_WINDOW,
            chart_range: "1y".to_string(),
            poll_secs: DEFAULT_POLL_SECS,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.last_symbol = Some("TCS.NS".into());
        settings.ma_window = 50;
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.last_symbol.as_deref(), Some("TCS.NS"));
        assert_eq!(loaded.ma_window, 50);
        assert_eq!(loaded.poll_secs, DEFAULT_POLL_SECS);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.ma_window, DEFAULT_MA_WINDOW);
        assert_eq!(loaded.chart_range, "1y");
    }
}
