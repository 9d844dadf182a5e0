use std::fmt::{Display, Formatter};

use crate::http_client::HttpError;
use crate::FeedId;

/// Feed-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    Unavailable,
    RateLimited,
    Timeout,
    BadStatus,
    Malformed,
    InvalidRequest,
}

/// Structured feed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    feed: FeedId,
    kind: FeedErrorKind,
    message: String,
    retryable: bool,
}

impl FeedError {
    pub fn unavailable(feed: FeedId, message: impl Into<String>) -> Self {
        Self::new(feed, FeedErrorKind::Unavailable, message, true)
    }

    pub fn rate_limited(feed: FeedId, message: impl Into<String>) -> Self {
        Self::new(feed, FeedErrorKind::RateLimited, message, true)
    }

    pub fn timeout(feed: FeedId, message: impl Into<String>) -> Self {
        Self::new(feed, FeedErrorKind::Timeout, message, true)
    }

    pub fn bad_status(feed: FeedId, status: u16) -> Self {
        Self::new(
            feed,
            FeedErrorKind::BadStatus,
            format!("{feed} returned status {status}"),
            false,
        )
    }

    pub fn malformed(feed: FeedId, message: impl Into<String>) -> Self {
        Self::new(feed, FeedErrorKind::Malformed, message, false)
    }

    pub fn invalid_request(feed: FeedId, message: impl Into<String>) -> Self {
        Self::new(feed, FeedErrorKind::InvalidRequest, message, false)
    }

    /// Classifies a non-2xx status.
    pub fn from_status(feed: FeedId, status: u16) -> Self {
        match status {
            429 => Self::rate_limited(feed, format!("{feed} rate limit exceeded (429)")),
            408 => Self::timeout(feed, format!("{feed} request timed out (408)")),
            500..=599 => Self::unavailable(feed, format!("{feed} returned status {status}")),
            _ => Self::bad_status(feed, status),
        }
    }

    pub fn from_transport(feed: FeedId, error: &HttpError) -> Self {
        let message = format!("{feed} transport error: {}", error.message());
        if error.timed_out() {
            Self::timeout(feed, message)
        } else if error.retryable() {
            Self::unavailable(feed, message)
        } else {
            Self::new(feed, FeedErrorKind::Unavailable, message, false)
        }
    }

    fn new(feed: FeedId, kind: FeedErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            feed,
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub const fn feed(&self) -> FeedId {
        self.feed
    }

    pub const fn kind(&self) -> FeedErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FeedErrorKind::Unavailable => "feed.unavailable",
            FeedErrorKind::RateLimited => "feed.rate_limited",
            FeedErrorKind::Timeout => "feed.timeout",
            FeedErrorKind::BadStatus => "feed.bad_status",
            FeedErrorKind::Malformed => "feed.malformed",
            FeedErrorKind::InvalidRequest => "feed.invalid_request",
        }
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FeedError {}
