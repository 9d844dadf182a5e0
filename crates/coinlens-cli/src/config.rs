//! File plus flag configuration for a `coinlens` run.

use std::path::Path;

use coinlens_core::AnalyticsConfig;
use coinlens_feeds::FeedConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Analytics and feed settings; both sections are optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub analytics: AnalyticsConfig,
    pub feeds: FeedConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|error| CliError::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    /// Loads `--config` when given, applies flag overrides and validates.
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let mut config = match &cli.config {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        if let Some(timeout_ms) = cli.timeout_ms {
            config.feeds.timeout_ms = timeout_ms;
        }

        config.validated()
    }

    /// Applies `--horizon` and re-checks the analytics section.
    pub fn with_horizon(mut self, horizon: Option<usize>) -> Result<Self, CliError> {
        if let Some(horizon_days) = horizon {
            self.analytics.horizon_days = horizon_days;
            self.analytics.validate()?;
        }
        Ok(self)
    }

    fn validated(self) -> Result<Self, CliError> {
        self.analytics.validate()?;
        let feeds = self.feeds.with_env_keys().validate()?;
        Ok(Self {
            analytics: self.analytics,
            feeds,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn file_values_override_defaults_and_flags_override_file() {
        let file = config_file(
            r#"{"analytics":{"short_window":20,"horizon_days":7},"feeds":{"timeout_ms":500,"local_currency":"eur"}}"#,
        );
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "coinlens",
            "--config",
            path.as_str(),
            "--timeout-ms",
            "900",
            "summary",
        ])
        .expect("parses");

        let config = AppConfig::resolve(&cli).expect("resolves");
        assert_eq!(config.analytics.short_window, 20);
        assert_eq!(config.analytics.long_window, 200);
        assert_eq!(config.analytics.horizon_days, 7);
        assert_eq!(config.feeds.timeout_ms, 900);
        assert_eq!(config.feeds.local_currency, "EUR");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = config_file(r#"{"analytics":{"short_windw":20}}"#);
        let error = AppConfig::from_file(file.path()).expect_err("must fail");
        assert!(matches!(error, CliError::Config { .. }));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn invalid_windows_fail_validation() {
        let file = config_file(r#"{"analytics":{"rsi_window":0}}"#);
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["coinlens", "--config", path.as_str(), "summary"])
            .expect("parses");

        let error = AppConfig::resolve(&cli).expect_err("must fail");
        assert!(matches!(error, CliError::Validation(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = AppConfig::from_file(&dir.path().join("absent.json")).expect_err("must fail");
        assert_eq!(error.exit_code(), 10);
    }

    #[test]
    fn horizon_flag_overrides_config() {
        let config = AppConfig::default().with_horizon(Some(14)).expect("valid horizon");
        assert_eq!(config.analytics.horizon_days, 14);
        let config = AppConfig::default().with_horizon(None).expect("unchanged");
        assert_eq!(config.analytics.horizon_days, 30);
    }

    #[test]
    fn oversized_horizon_flag_is_rejected() {
        let error = AppConfig::default()
            .with_horizon(Some(1_000_000_000_000))
            .expect_err("must fail");
        assert!(matches!(error, CliError::Validation(_)));
        assert_eq!(error.exit_code(), 2);
    }
}
