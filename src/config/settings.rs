//! Report settings.
//!
//! Loaded from an optional TOML file (`ap-tracker.toml` by default). Every key has a
//! default, so a missing file or a partial file is fine; only an unreadable or malformed
//! file is an error.
//!
//! ```toml
//! database_url = "sqlite://data/ap_tracker.sqlite?mode=rwc"
//!
//! [dashboard]
//! urgent_window_days = 7
//! default_granularity = "month"
//! series_lookback_months = 12
//! ```

use crate::core::bucketing::Granularity;
use crate::core::warning::DEFAULT_URGENT_WINDOW_DAYS;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "ap-tracker.toml";

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    pub database_url: Option<String>,
    /// Dashboard report settings
    pub dashboard: DashboardSettings,
}

/// `[dashboard]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Days ahead of today that still count as urgent
    pub urgent_window_days: u32,
    /// Resolution of the payment series when none is requested
    pub default_granularity: Granularity,
    /// Calendar months covered by the payment series when no range is requested
    pub series_lookback_months: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            urgent_window_days: DEFAULT_URGENT_WINDOW_DAYS,
            default_granularity: Granularity::Month,
            series_lookback_months: 12,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML for
/// [`Settings`].
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Loading settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `path` if given, otherwise from [`DEFAULT_SETTINGS_FILE`] when it
/// exists, otherwise returns the defaults.
pub fn load_settings_or_default(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => load_settings(path),
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => load_settings(DEFAULT_SETTINGS_FILE),
        None => {
            debug!("No settings file found, using defaults");
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            database_url = "sqlite://ledger.sqlite"

            [dashboard]
            urgent_window_days = 14
            default_granularity = "day"
            series_lookback_months = 3
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.database_url.as_deref(), Some("sqlite://ledger.sqlite"));
        assert_eq!(settings.dashboard.urgent_window_days, 14);
        assert_eq!(settings.dashboard.default_granularity, Granularity::Day);
        assert_eq!(settings.dashboard.series_lookback_months, 3);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = toml::from_str("[dashboard]\nurgent_window_days = 3\n").unwrap();
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.dashboard.urgent_window_days, 3);
        assert_eq!(settings.dashboard.default_granularity, Granularity::Month);
        assert_eq!(settings.dashboard.series_lookback_months, 12);
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\ndefault_granularity = \"year\"").unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.dashboard.default_granularity, Granularity::Year);
    }

    #[test]
    fn test_malformed_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nurgent_window_days = \"soon\"").unwrap();

        let err = load_settings(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = load_settings_or_default(Some(Path::new("/nonexistent/ap-tracker.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
