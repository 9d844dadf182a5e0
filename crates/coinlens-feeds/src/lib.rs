//! # Coinlens Feeds
//!
//! Series ingestion and market snapshot feeds for coinlens.
//!
//! Every adapter talks to its upstream through the [`HttpClient`] trait:
//! [`ReqwestHttpClient`] in production, [`FixtureHttpClient`] in tests and
//! offline mode. Transient failures (timeouts, 408/429/5xx) are retried
//! with exponential backoff; everything else surfaces as a [`FeedError`]
//! with a stable code.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | CryptoCompare, CoinGecko and alternative.me adapters |
//! | [`config`] | [`FeedConfig`] endpoints, limits and retry policy |
//! | [`error`] | [`FeedError`] classification |
//! | [`http_client`] | Transport abstraction |
//! | [`market`] | [`MarketFeeds`] bundle |
//! | [`offline`] | Synthetic payloads |
//! | [`retry`] | Backoff and retry loop |
//! | [`source`] | Feed and asset identifiers |

pub mod adapters;
pub mod config;
pub mod error;
pub mod http_client;
pub mod market;
pub mod offline;
pub mod retry;
pub mod source;

pub use adapters::{CoinGeckoAdapter, CryptoCompareAdapter, FearGreedAdapter};
pub use config::{FeedConfig, COINGECKO_API_KEY_ENV, CRYPTOCOMPARE_API_KEY_ENV};
pub use error::{FeedError, FeedErrorKind};
pub use http_client::{
    FixtureHttpClient, HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};
pub use market::{FeedFailure, MarketData, MarketFeeds, SnapshotReport};
pub use retry::{execute_with_retry, Backoff, RetryConfig};
pub use source::{Asset, FeedId};
