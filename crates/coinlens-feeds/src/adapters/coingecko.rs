use std::collections::BTreeMap;
use std::sync::Arc;

use coinlens_core::{validate_percentage, SpotQuote, QUOTE_CURRENCY};
use serde::Deserialize;

use super::fetch_json;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{FeedConfig, FeedError, FeedId};

const FEED: FeedId = FeedId::CoinGecko;
const GOLD_TOKEN_ID: &str = "tether-gold";

type SimplePrice = BTreeMap<String, BTreeMap<String, f64>>;

/// Spot prices, gold and market dominance from CoinGecko.
#[derive(Clone)]
pub struct CoinGeckoAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    quote_currency: String,
    local_currency: String,
    timeout_ms: u64,
    auth: HttpAuth,
    retry: RetryConfig,
}

impl CoinGeckoAdapter {
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FeedConfig) -> Self {
        Self {
            http_client,
            base_url: config.coingecko_url.clone(),
            quote_currency: QUOTE_CURRENCY.to_ascii_lowercase(),
            local_currency: config.local_currency.to_ascii_lowercase(),
            timeout_ms: config.timeout_ms,
            auth: config.coingecko_auth(),
            retry: config.retry(),
        }
    }

    /// BTC price in the quote and local currencies; the exchange rate is
    /// derived from the pair.
    pub async fn spot(&self) -> Result<SpotQuote, FeedError> {
        let currencies = format!("{},{}", self.quote_currency, self.local_currency);
        let prices = self.simple_price("bitcoin", &currencies).await?;

        let quote = price_of(&prices, "bitcoin", &self.quote_currency)?;
        let local = price_of(&prices, "bitcoin", &self.local_currency)?;
        SpotQuote::from_prices(quote, local, &self.local_currency)
            .map_err(|e| FeedError::malformed(FEED, format!("invalid spot quote: {e}")))
    }

    /// Gold price per troy ounce in the quote currency, via a gold-backed token.
    pub async fn gold_per_ounce(&self) -> Result<f64, FeedError> {
        let prices = self.simple_price(GOLD_TOKEN_ID, &self.quote_currency).await?;
        let price = price_of(&prices, GOLD_TOKEN_ID, &self.quote_currency)?;
        if !(price.is_finite() && price > 0.0) {
            return Err(FeedError::malformed(FEED, format!("invalid gold price {price}")));
        }
        Ok(price)
    }

    /// Bitcoin share of total crypto market capitalization, in percent.
    pub async fn btc_dominance(&self) -> Result<f64, FeedError> {
        let request = self.request(format!("{}/api/v3/global", self.base_url));
        let payload: GlobalResponse =
            fetch_json(self.http_client.as_ref(), request, &self.retry, FEED).await?;

        let share = payload
            .data
            .market_cap_percentage
            .get("btc")
            .copied()
            .ok_or_else(|| FeedError::malformed(FEED, "global response has no btc share"))?;
        validate_percentage("btc_dominance_pct", share)
            .map_err(|e| FeedError::malformed(FEED, e.to_string()))
    }

    async fn simple_price(&self, ids: &str, currencies: &str) -> Result<SimplePrice, FeedError> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies={}",
            self.base_url,
            urlencoding::encode(ids),
            urlencoding::encode(currencies)
        );
        fetch_json(self.http_client.as_ref(), self.request(url), &self.retry, FEED).await
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .with_auth(&self.auth)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms)
    }
}

fn price_of(prices: &SimplePrice, id: &str, currency: &str) -> Result<f64, FeedError> {
    prices
        .get(id)
        .and_then(|by_currency| by_currency.get(currency))
        .copied()
        .ok_or_else(|| FeedError::malformed(FEED, format!("no {currency} price for '{id}'")))
}

#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    #[serde(default)]
    market_cap_percentage: BTreeMap<String, f64>,
}
