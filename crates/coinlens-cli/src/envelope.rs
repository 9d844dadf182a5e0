use coinlens_feeds::{FeedFailure, FeedId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for all `coinlens` machine-readable outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub sources: Vec<FeedId>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Non-fatal failure reported next to the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<FeedId>,
}

impl From<&FeedFailure> for EnvelopeError {
    fn from(failure: &FeedFailure) -> Self {
        Self {
            code: failure.error.code().to_owned(),
            message: format!("{}: {}", failure.piece, failure.error.message()),
            retryable: Some(failure.error.retryable()),
            source: Some(failure.error.feed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use coinlens_feeds::FeedError;

    use super::*;

    #[test]
    fn feed_failure_keeps_code_and_source() {
        let failure = FeedFailure {
            piece: "gold",
            error: FeedError::rate_limited(FeedId::CoinGecko, "slow down"),
        };

        let error = EnvelopeError::from(&failure);
        assert_eq!(error.code, "feed.rate_limited");
        assert_eq!(error.message, "gold: slow down");
        assert_eq!(error.retryable, Some(true));
        assert_eq!(error.source, Some(FeedId::CoinGecko));
    }

    #[test]
    fn empty_errors_are_omitted() {
        let envelope = Envelope {
            meta: EnvelopeMeta {
                request_id: String::from("id"),
                schema_version: SCHEMA_VERSION.to_owned(),
                generated_at: OffsetDateTime::UNIX_EPOCH,
                sources: vec![FeedId::Offline],
                latency_ms: 3,
                warnings: Vec::new(),
            },
            data: serde_json::json!({}),
            errors: Vec::new(),
        };

        let value = serde_json::to_value(&envelope).expect("serializes");
        assert!(value.get("errors").is_none());
        assert!(value["meta"].get("warnings").is_none());
        assert_eq!(value["meta"]["generated_at"], "1970-01-01T00:00:00Z");
        assert_eq!(value["meta"]["sources"][0], "offline");
    }
}
