use std::sync::Arc;

use coinlens_core::FearGreed;
use serde::Deserialize;

use super::fetch_json;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{FeedConfig, FeedError, FeedId};

const FEED: FeedId = FeedId::AlternativeMe;

/// Crypto Fear & Greed index from alternative.me.
#[derive(Clone)]
pub struct FearGreedAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    retry: RetryConfig,
}

impl FearGreedAdapter {
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FeedConfig) -> Self {
        Self {
            http_client,
            base_url: config.fear_greed_url.clone(),
            timeout_ms: config.timeout_ms,
            retry: config.retry(),
        }
    }

    /// Latest reading.
    pub async fn latest(&self) -> Result<FearGreed, FeedError> {
        let request = HttpRequest::get(format!("{}/fng/?limit=1", self.base_url))
            .with_timeout_ms(self.timeout_ms);
        let payload: FngResponse =
            fetch_json(self.http_client.as_ref(), request, &self.retry, FEED).await?;

        if let Some(error) = payload.metadata.and_then(|metadata| metadata.error) {
            return Err(FeedError::malformed(FEED, format!("fear & greed API error: {error}")));
        }

        let entry = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::malformed(FEED, "fear & greed response has no data"))?;
        let value = entry.value.trim().parse::<u8>().map_err(|_| {
            FeedError::malformed(FEED, format!("fear & greed value '{}' is not 0-100", entry.value))
        })?;

        FearGreed::new(value, entry.value_classification)
            .map_err(|e| FeedError::malformed(FEED, e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
    #[serde(default)]
    metadata: Option<FngMetadata>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
}

#[derive(Debug, Deserialize)]
struct FngMetadata {
    #[serde(default)]
    error: Option<String>,
}
