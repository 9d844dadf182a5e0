use std::sync::Arc;

use coinlens_core::{MarketSnapshot, PriceSeries, SpotQuote, TradingDate};
use tracing::{info, warn};

use crate::adapters::{CoinGeckoAdapter, CryptoCompareAdapter, FearGreedAdapter};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::offline::synthetic_client;
use crate::{Asset, FeedConfig, FeedError, FeedId};

/// A snapshot piece that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFailure {
    pub piece: &'static str,
    pub error: FeedError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReport {
    pub snapshot: MarketSnapshot,
    pub failures: Vec<FeedFailure>,
}

/// Histories plus snapshot for one dashboard run.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    pub primary: PriceSeries,
    pub comparison: Option<PriceSeries>,
    pub snapshot: MarketSnapshot,
    pub failures: Vec<FeedFailure>,
}

/// Bundles every adapter behind one shared transport.
#[derive(Clone)]
pub struct MarketFeeds {
    history: CryptoCompareAdapter,
    prices: CoinGeckoAdapter,
    sentiment: FearGreedAdapter,
    history_limit: usize,
    offline: bool,
}

impl MarketFeeds {
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FeedConfig) -> Self {
        Self {
            history: CryptoCompareAdapter::with_http_client(Arc::clone(&http_client), config),
            prices: CoinGeckoAdapter::with_http_client(Arc::clone(&http_client), config),
            sentiment: FearGreedAdapter::with_http_client(http_client, config),
            history_limit: config.history_limit,
            offline: false,
        }
    }

    /// Synthetic data ending on `anchor`; no network access.
    pub fn offline(config: &FeedConfig, anchor: TradingDate) -> Self {
        let client: Arc<dyn HttpClient> = Arc::new(synthetic_client(config, anchor));
        Self {
            offline: true,
            ..Self::with_http_client(client, config)
        }
    }

    pub const fn is_offline(&self) -> bool {
        self.offline
    }

    /// Upstreams contacted by this bundle.
    pub fn sources(&self) -> Vec<FeedId> {
        if self.offline {
            return vec![FeedId::Offline];
        }
        vec![FeedId::CryptoCompare, FeedId::CoinGecko, FeedId::AlternativeMe]
    }

    pub async fn history(&self, asset: Asset, with_volume: bool) -> Result<PriceSeries, FeedError> {
        self.history
            .daily_history(asset, self.history_limit, with_volume)
            .await
    }

    pub async fn spot(&self) -> Result<SpotQuote, FeedError> {
        self.prices.spot().await
    }

    /// Fetches every snapshot piece concurrently. A failed piece is left
    /// empty and reported; it never hides the others.
    pub async fn snapshot(&self) -> SnapshotReport {
        let (spot, gold, dominance, fear_greed) = tokio::join!(
            self.prices.spot(),
            self.prices.gold_per_ounce(),
            self.prices.btc_dominance(),
            self.sentiment.latest(),
        );

        let mut failures = Vec::new();
        let snapshot = MarketSnapshot {
            spot: keep("spot", spot, &mut failures),
            gold_usd_per_ounce: keep("gold", gold, &mut failures),
            btc_dominance_pct: keep("dominance", dominance, &mut failures),
            fear_greed: keep("fear_greed", fear_greed, &mut failures),
        };

        SnapshotReport { snapshot, failures }
    }

    /// Primary BTC history with volume, an optional close-only comparison
    /// history and the snapshot. Only a primary history failure is fatal.
    pub async fn market_data(&self, comparison: Option<Asset>) -> Result<MarketData, FeedError> {
        let (primary, compared, report) = tokio::join!(
            self.history(Asset::Btc, true),
            async {
                match comparison {
                    Some(asset) => Some(self.history(asset, false).await),
                    None => None,
                }
            },
            self.snapshot(),
        );

        let primary = primary?;
        let mut failures = report.failures;
        let comparison = match compared {
            Some(result) => keep("comparison", result, &mut failures),
            None => None,
        };

        info!(
            points = primary.len(),
            failures = failures.len(),
            offline = self.offline,
            "market data fetched"
        );

        Ok(MarketData {
            primary,
            comparison,
            snapshot: report.snapshot,
            failures,
        })
    }
}

fn keep<T>(
    piece: &'static str,
    result: Result<T, FeedError>,
    failures: &mut Vec<FeedFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(piece, feed = %error.feed(), code = error.code(), error = %error, "feed piece unavailable");
            failures.push(FeedFailure { piece, error });
            None
        }
    }
}
