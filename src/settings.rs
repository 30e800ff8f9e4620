use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::engine::Page;
use crate::reference::mushaf::MUSHAF_TOTAL_PAGES;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("total_pages must be at least 1")]
    NoPages,

    #[error("segments_per_month must be within 1..={max}, got {value}")]
    SegmentCount { value: u32, max: u32 },

    #[error("reminder_interval_days must be at least 1")]
    ReminderInterval,

    #[error("app_url must be an http(s) URL, got {0:?}")]
    AppUrl(String),

    #[error("timezone must not be empty")]
    Timezone,
}

/// Coordination settings for cycle generation and reminders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub total_pages: Page,
    pub segments_per_month: u32,
    pub reminder_interval_days: u32,
    pub timezone: String,
    pub app_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_pages: MUSHAF_TOTAL_PAGES,
            segments_per_month: 30,
            reminder_interval_days: 7,
            timezone: "Europe/Berlin".to_string(),
            app_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .context(format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.total_pages == 0 {
            return Err(SettingsError::NoPages);
        }
        if self.segments_per_month == 0 || self.segments_per_month > self.total_pages {
            return Err(SettingsError::SegmentCount {
                value: self.segments_per_month,
                max: self.total_pages,
            });
        }
        if self.reminder_interval_days == 0 {
            return Err(SettingsError::ReminderInterval);
        }
        if !(self.app_url.starts_with("http://") || self.app_url.starts_with("https://")) {
            return Err(SettingsError::AppUrl(self.app_url.clone()));
        }
        if self.timezone.trim().is_empty() {
            return Err(SettingsError::Timezone);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.total_pages, 604);
        assert_eq!(settings.segments_per_month, 30);
        assert_eq!(settings.reminder_interval_days, 7);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"segments_per_month": 60}"#).unwrap();
        assert_eq!(settings.segments_per_month, 60);
        assert_eq!(settings.total_pages, 604);
        assert_eq!(settings.timezone, "Europe/Berlin");
    }

    #[test]
    fn test_rejects_too_many_segments() {
        let settings = Settings {
            segments_per_month: 605,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::SegmentCount { value: 605, max: 604 })
        );
    }

    #[test]
    fn test_rejects_zero_interval_and_bad_url() {
        let settings = Settings {
            reminder_interval_days: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ReminderInterval));

        let settings = Settings {
            app_url: "localhost".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::AppUrl(_))));
    }

    #[test]
    fn test_load_file_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"segments_per_month": 60, "app_url": "https://khatm.example.org"}}"#
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.segments_per_month, 60);
        assert_eq!(settings.app_url, "https://khatm.example.org");
        assert_eq!(settings.total_pages, 604);
        assert_eq!(settings.reminder_interval_days, 7);
        assert_eq!(settings.timezone, "Europe/Berlin");
        assert!(settings.validate().is_ok());

        let same = Settings::load_or_default(Some(file.path())).unwrap();
        assert_eq!(same, settings);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "segments_per_month = 60").unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Settings::load(Path::new("/nonexistent/khatm-settings.json"));
        assert!(result.is_err());
    }
}
