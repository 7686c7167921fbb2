// ⚙️ Dashboard configuration
//
// Binaries parse flags and HCRIS_* environment variables with clap and hand
// the result over as a DashboardConfig. Library code never reads the
// environment itself.

use crate::dashboard::{ViewOptions, DEFAULT_YEAR};
use crate::views::View;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

pub const VIEW_ENV: &str = "HCRIS_VIEW";
pub const YEAR_ENV: &str = "HCRIS_YEAR";
pub const EXPORT_DIR_ENV: &str = "HCRIS_EXPORT_DIR";
pub const LISTEN_ENV: &str = "HCRIS_LISTEN";

pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

/// Default log filter; RUST_LOG overrides it
pub const DEFAULT_LOG_FILTER: &str = "hcris_dashboard=info";

/// Log filter while the TUI owns the terminal
pub const TUI_LOG_FILTER: &str = "warn";

pub const SERVER_LOG_FILTER: &str = "hcris_dashboard=info,hcris_server=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// View shown first
    pub view: View,

    /// Year preselected in the contract labor view
    pub year: u16,

    /// Directory the CSV export is written to
    pub export_dir: PathBuf,

    /// Listen address of the HTTP server
    pub listen: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            view: View::Overview,
            year: DEFAULT_YEAR,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Lenient: an unknown view label falls back to Overview
    pub fn with_view_label(mut self, label: &str) -> Self {
        self.view = View::select(label);
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = year;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_listen(mut self, listen: &str) -> Self {
        self.listen = listen.to_string();
        self
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions::for_year(self.year)
    }
}

/// Lenient year from request input.
///
/// Anything that is not a `u16` falls back to `default`. A well-formed year
/// with no data is kept; views render placeholders for it.
pub fn year_or(raw: Option<&str>, default: u16) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    match raw.parse() {
        Ok(year) => year,
        Err(_) => {
            warn!(input = raw, fallback = default, "unparseable year, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.view, View::Overview);
        assert_eq!(config.year, 2023);
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.listen, "0.0.0.0:3000");
        assert_eq!(config.view_options(), ViewOptions::default());
    }

    #[test]
    fn test_unknown_view_label_falls_back() {
        let config = DashboardConfig::default().with_view_label("Financial Metrics");
        assert_eq!(config.view, View::Financial);

        let config = config.with_view_label("Nonexistent View");
        assert_eq!(config.view, View::Overview);
    }

    #[test]
    fn test_builders() {
        let config = DashboardConfig::default()
            .with_year(2021)
            .with_export_dir("/tmp/out");
        assert_eq!(config.view_options().year, 2021);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));

        let config = config.with_listen("127.0.0.1:8080");
        assert_eq!(config.listen, "127.0.0.1:8080");
    }

    #[test]
    fn test_year_or() {
        assert_eq!(year_or(Some("2021"), 2023), 2021);
        assert_eq!(year_or(Some(" 2022 "), 2023), 2022);
        assert_eq!(year_or(Some("2019"), 2023), 2019);
        assert_eq!(year_or(None, 2023), 2023);
        assert_eq!(year_or(Some(""), 2023), 2023);
        assert_eq!(year_or(Some("abc"), 2023), 2023);
        assert_eq!(year_or(Some("99999"), 2023), 2023);
        assert_eq!(year_or(Some("-1"), 2023), 2023);
    }
}
