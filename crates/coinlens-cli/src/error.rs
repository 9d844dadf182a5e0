use std::path::PathBuf;

use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] coinlens_core::ValidationError),

    #[error(transparent)]
    Analytics(#[from] coinlens_core::AnalyticsError),

    #[error(transparent)]
    Feed(#[from] coinlens_feeds::FeedError),

    #[error("invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Analytics(_) | Self::Config { .. } => 2,
            Self::Feed(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use coinlens_core::AnalyticsError;
    use coinlens_feeds::{FeedError, FeedId};

    use super::*;

    #[test]
    fn exit_codes_follow_failure_category() {
        let insufficient = CliError::from(AnalyticsError::InsufficientData {
            operation: "forecast",
            required: 2,
            available: 1,
        });
        let feed = CliError::from(FeedError::timeout(FeedId::CoinGecko, "slow"));
        let strict = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };

        assert_eq!(insufficient.exit_code(), 2);
        assert_eq!(feed.exit_code(), 3);
        assert_eq!(strict.exit_code(), 5);
    }
}
