//! Upstream feed adapters.
//!
//! | Adapter | Upstream | Provides |
//! |---------|----------|----------|
//! | [`CryptoCompareAdapter`] | min-api.cryptocompare.com | daily close history |
//! | [`CoinGeckoAdapter`] | api.coingecko.com | spot quote, gold, dominance |
//! | [`FearGreedAdapter`] | api.alternative.me | Fear & Greed index |

mod alternative_me;
mod coingecko;
mod cryptocompare;

use serde::de::DeserializeOwned;

use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::{execute_with_retry, RetryConfig};
use crate::{FeedError, FeedId};

pub use alternative_me::FearGreedAdapter;
pub use coingecko::CoinGeckoAdapter;
pub use cryptocompare::CryptoCompareAdapter;

/// Executes `request` with retries and decodes the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    request: HttpRequest,
    retry: &RetryConfig,
    feed: FeedId,
) -> Result<T, FeedError> {
    let response = execute_with_retry(client, request, retry, feed).await?;
    serde_json::from_str(&response.body)
        .map_err(|e| FeedError::malformed(feed, format!("failed to decode {feed} response: {e}")))
}
