//! Retry with exponential backoff and jitter.

use std::time::Duration;

use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{FeedError, FeedId};

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed {
        delay: Duration,
    },
    /// `base * factor^attempt`, capped at `max`, optionally jittered by +/- 50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(3),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = (base.as_secs_f64() * factor.powi(exponent)).min(max.as_secs_f64());
                let delay = Duration::try_from_secs_f64(seconds).unwrap_or(max).min(max);
                if !jitter {
                    return delay;
                }

                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                let spread = millis / 2;
                let offset = fastrand::u64(0..=spread * 2);
                Duration::from_millis(millis.saturating_add(offset).saturating_sub(spread))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 2,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
        }
    }
}

impl RetryConfig {
    pub fn exponential(max_retries: u32, base: Duration, max: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Exponential {
                base,
                factor: 2.0,
                max,
                jitter: true,
            },
            ..Self::default()
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    const fn retries(&self) -> u32 {
        if self.enabled {
            self.max_retries
        } else {
            0
        }
    }
}

/// Executes `request`, retrying transient failures per `retry`.
///
/// Returns the first 2xx response. Non-retryable statuses and exhausted
/// retries surface as the matching [`FeedError`].
pub async fn execute_with_retry(
    client: &dyn HttpClient,
    request: HttpRequest,
    retry: &RetryConfig,
    feed: FeedId,
) -> Result<HttpResponse, FeedError> {
    let retries = retry.retries();
    let mut attempt = 0;

    loop {
        debug!(feed = %feed, url = %request.url, attempt, "feed request");
        let error = match client.execute(request.clone()).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                let error = FeedError::from_status(feed, response.status);
                if !retry.should_retry_status(response.status) {
                    return Err(error);
                }
                error
            }
            Err(transport) => {
                let error = FeedError::from_transport(feed, &transport);
                let retryable = if transport.timed_out() {
                    retry.retry_on_timeout
                } else {
                    transport.retryable()
                };
                if !retryable {
                    return Err(error);
                }
                error
            }
        };

        if attempt >= retries {
            warn!(feed = %feed, attempts = attempt + 1, code = error.code(), "feed request gave up");
            return Err(error);
        }

        let delay = retry.delay_for_attempt(attempt);
        warn!(
            feed = %feed,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "retrying feed request"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{FixtureHttpClient, HttpError};
    use crate::FeedErrorKind;

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(100),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(10), Duration::from_millis(100));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: false,
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(4), Duration::from_secs(1));
    }

    #[test]
    fn jitter_stays_within_half_of_delay() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: true,
        };
        for attempt in 0..5 {
            let expected = (100.0 * 2_f64.powi(attempt as i32)).min(1000.0);
            let delay = backoff.delay(attempt).as_millis() as f64;
            assert!(delay >= expected * 0.49 && delay <= expected * 1.51, "attempt={attempt} delay={delay}");
        }
    }

    #[test]
    fn huge_caps_saturate_instead_of_overflowing() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_millis(u64::MAX),
            jitter: true,
        };
        for attempt in [0, 10, 64, 1_000, u32::MAX] {
            assert!(backoff.delay(attempt) <= Duration::from_millis(u64::MAX));
        }

        let unjittered = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::MAX,
            jitter: false,
        };
        assert!(unjittered.delay(u32::MAX) <= Duration::MAX);
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let client = FixtureHttpClient::new().with_sequence(
            "/global",
            vec![
                Ok(HttpResponse::with_status(502, "")),
                Ok(HttpResponse::with_status(503, "")),
                Ok(HttpResponse::ok_json("{}")),
            ],
        );
        let retry = RetryConfig::fixed(Duration::ZERO, 2);

        let response = execute_with_retry(
            &client,
            HttpRequest::get("https://x/api/v3/global"),
            &retry,
            FeedId::CoinGecko,
        )
        .await
        .expect("third attempt succeeds");

        assert_eq!(response.status, 200);
        assert_eq!(client.request_count("/global"), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let client = FixtureHttpClient::new()
            .with_sequence("/global", vec![Ok(HttpResponse::with_status(400, ""))]);
        let retry = RetryConfig::fixed(Duration::ZERO, 3);

        let error = execute_with_retry(
            &client,
            HttpRequest::get("https://x/api/v3/global"),
            &retry,
            FeedId::CoinGecko,
        )
        .await
        .expect_err("must fail");

        assert_eq!(error.kind(), FeedErrorKind::BadStatus);
        assert_eq!(client.request_count("/global"), 1);
    }

    #[tokio::test]
    async fn exhausted_timeouts_surface_as_timeout() {
        let client = FixtureHttpClient::new()
            .with_sequence("/fng/", vec![Err(HttpError::timeout("deadline elapsed"))]);
        let retry = RetryConfig::fixed(Duration::ZERO, 1);

        let error = execute_with_retry(
            &client,
            HttpRequest::get("https://x/fng/"),
            &retry,
            FeedId::AlternativeMe,
        )
        .await
        .expect_err("must fail");

        assert_eq!(error.kind(), FeedErrorKind::Timeout);
        assert_eq!(client.request_count("/fng/"), 2);
    }

    #[tokio::test]
    async fn disabled_retry_makes_one_attempt() {
        let client = FixtureHttpClient::new()
            .with_sequence("/fng/", vec![Ok(HttpResponse::with_status(503, ""))]);

        let error = execute_with_retry(
            &client,
            HttpRequest::get("https://x/fng/"),
            &RetryConfig::no_retry(),
            FeedId::AlternativeMe,
        )
        .await
        .expect_err("must fail");

        assert_eq!(error.kind(), FeedErrorKind::Unavailable);
        assert_eq!(client.request_count("/fng/"), 1);
    }
}
