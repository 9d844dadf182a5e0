use std::time::Duration;

use coinlens_core::{validate_currency_code, ValidationError};
use serde::{Deserialize, Serialize};

use crate::http_client::HttpAuth;
use crate::retry::RetryConfig;

pub const CRYPTOCOMPARE_API_KEY_ENV: &str = "COINLENS_CRYPTOCOMPARE_API_KEY";
pub const COINGECKO_API_KEY_ENV: &str = "COINLENS_COINGECKO_API_KEY";

/// Endpoints, limits and retry policy for the market feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub timeout_ms: u64,
    /// Days of daily history requested per asset.
    pub history_limit: usize,
    pub local_currency: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub cryptocompare_url: String,
    pub coingecko_url: String,
    pub fear_greed_url: String,
    #[serde(skip_serializing)]
    pub cryptocompare_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub coingecko_api_key: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            history_limit: 2_000,
            local_currency: String::from("BRL"),
            max_retries: 2,
            backoff_base_ms: 200,
            backoff_max_ms: 3_000,
            cryptocompare_url: String::from("https://min-api.cryptocompare.com"),
            coingecko_url: String::from("https://api.coingecko.com"),
            fear_greed_url: String::from("https://api.alternative.me"),
            cryptocompare_api_key: None,
            coingecko_api_key: None,
        }
    }
}

impl FeedConfig {
    /// Fills unset API keys from the environment.
    pub fn with_env_keys(mut self) -> Self {
        if self.cryptocompare_api_key.is_none() {
            self.cryptocompare_api_key = std::env::var(CRYPTOCOMPARE_API_KEY_ENV).ok();
        }
        if self.coingecko_api_key.is_none() {
            self.coingecko_api_key = std::env::var(COINGECKO_API_KEY_ENV).ok();
        }
        self
    }

    /// Validates and normalizes currency codes.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.local_currency = validate_currency_code(&self.local_currency)?;
        if self.history_limit == 0 {
            return Err(ValidationError::InvalidWindow {
                name: "history_limit",
                value: 0,
                min: 1,
            });
        }
        for base in [
            &mut self.cryptocompare_url,
            &mut self.coingecko_url,
            &mut self.fear_greed_url,
        ] {
            let trimmed = base.trim_end_matches('/').len();
            base.truncate(trimmed);
        }
        Ok(self)
    }

    pub fn retry(&self) -> RetryConfig {
        if self.max_retries == 0 {
            return RetryConfig::no_retry();
        }
        RetryConfig::exponential(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }

    pub(crate) fn cryptocompare_auth(&self) -> HttpAuth {
        match &self.cryptocompare_api_key {
            Some(key) => HttpAuth::Header {
                name: String::from("authorization"),
                value: format!("Apikey {key}"),
            },
            None => HttpAuth::None,
        }
    }

    pub(crate) fn coingecko_auth(&self) -> HttpAuth {
        match &self.coingecko_api_key {
            Some(key) => HttpAuth::Header {
                name: String::from("x-cg-demo-api-key"),
                value: key.clone(),
            },
            None => HttpAuth::None,
        }
    }
}
