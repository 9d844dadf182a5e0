use std::fmt::{Display, Formatter};

use coinlens_feeds::FeedId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::envelope::{EnvelopeMeta, SCHEMA_VERSION};

/// Request identifier (UUID v4) for end-to-end request tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Command metadata collected before the envelope is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub sources: Vec<FeedId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(sources: Vec<FeedId>, latency_ms: u64) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            sources,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> EnvelopeMeta {
        EnvelopeMeta {
            request_id: self.request_id.to_string(),
            schema_version: SCHEMA_VERSION.to_owned(),
            generated_at: OffsetDateTime::now_utc(),
            sources: self.sources,
            latency_ms: self.latency_ms,
            warnings: self.warnings,
        }
    }
}
