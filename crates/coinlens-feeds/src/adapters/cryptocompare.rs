use std::sync::Arc;

use coinlens_core::{PricePoint, PriceSeries, TradingDate, QUOTE_CURRENCY};
use serde::Deserialize;
use tracing::debug;

use super::fetch_json;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{Asset, FeedConfig, FeedError, FeedId};

const FEED: FeedId = FeedId::CryptoCompare;

/// Daily close history from CryptoCompare's `histoday` endpoint.
#[derive(Clone)]
pub struct CryptoCompareAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    auth: HttpAuth,
    retry: RetryConfig,
}

impl CryptoCompareAdapter {
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FeedConfig) -> Self {
        Self {
            http_client,
            base_url: config.cryptocompare_url.clone(),
            timeout_ms: config.timeout_ms,
            auth: config.cryptocompare_auth(),
            retry: config.retry(),
        }
    }

    pub fn history_url(&self, asset: Asset, limit: usize) -> String {
        format!(
            "{}/data/v2/histoday?fsym={}&tsym={}&limit={}&aggregate=1",
            self.base_url,
            urlencoding::encode(asset.symbol()),
            urlencoding::encode(QUOTE_CURRENCY),
            limit
        )
    }

    /// Fetches up to `limit` days of closes ending today.
    ///
    /// Volume (`volumeto`, in the quote currency) is kept only when
    /// `with_volume` is set. Leading zero-close days, which the upstream
    /// uses to pad dates before an asset existed, are dropped.
    pub async fn daily_history(
        &self,
        asset: Asset,
        limit: usize,
        with_volume: bool,
    ) -> Result<PriceSeries, FeedError> {
        if limit == 0 {
            return Err(FeedError::invalid_request(
                FEED,
                "history limit must be greater than zero",
            ));
        }

        let request = HttpRequest::get(self.history_url(asset, limit))
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);
        let payload: HistodayResponse =
            fetch_json(self.http_client.as_ref(), request, &self.retry, FEED).await?;

        let series = normalize_history(payload, with_volume)?;
        debug!(asset = %asset, points = series.len(), "cryptocompare history received");
        Ok(series)
    }
}

fn normalize_history(payload: HistodayResponse, with_volume: bool) -> Result<PriceSeries, FeedError> {
    if payload.response.eq_ignore_ascii_case("error") {
        return Err(FeedError::malformed(
            FEED,
            format!("cryptocompare API error: {}", payload.message),
        ));
    }

    let bars = payload
        .data
        .and_then(|data| data.data)
        .ok_or_else(|| FeedError::malformed(FEED, "cryptocompare response has no Data.Data"))?;

    let padding = bars.iter().take_while(|bar| bar.close == 0.0).count();
    let mut points = Vec::with_capacity(bars.len() - padding);
    for bar in &bars[padding..] {
        let date = TradingDate::from_unix_timestamp(bar.time)
            .map_err(|e| FeedError::malformed(FEED, e.to_string()))?;
        let volume = if with_volume { bar.volumeto } else { None };
        let point = PricePoint::new(date, bar.close, volume)
            .map_err(|e| FeedError::malformed(FEED, format!("bar at {date}: {e}")))?;
        points.push(point);
    }

    PriceSeries::new(points).map_err(|e| FeedError::malformed(FEED, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct HistodayResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Option<HistodayData>,
}

#[derive(Debug, Deserialize)]
struct HistodayData {
    #[serde(rename = "Data", default)]
    data: Option<Vec<HistodayBar>>,
}

#[derive(Debug, Deserialize)]
struct HistodayBar {
    time: i64,
    close: f64,
    #[serde(default)]
    volumeto: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::FixtureHttpClient;
    use crate::FeedErrorKind;

    fn adapter(client: FixtureHttpClient) -> CryptoCompareAdapter {
        CryptoCompareAdapter::with_http_client(Arc::new(client), &FeedConfig::default())
    }

    const BODY: &str = r#"{
        "Response": "Success",
        "Message": "",
        "Data": {"Aggregated": false, "Data": [
            {"time": 1704067200, "close": 0, "volumeto": 0},
            {"time": 1704153600, "close": 42000.5, "volumeto": 1500000.0},
            {"time": 1704240000, "close": 43000.0, "volumeto": 1600000.0}
        ]}
    }"#;

    #[tokio::test]
    async fn maps_bars_and_drops_leading_padding() {
        let series = adapter(FixtureHttpClient::new().with_json("fsym=BTC", BODY))
            .daily_history(Asset::Btc, 3, true)
            .await
            .expect("history");

        assert_eq!(series.len(), 2);
        let first = series.first().expect("point");
        assert_eq!(first.date.to_string(), "2024-01-02");
        assert_eq!(first.volume, Some(1_500_000.0));
    }

    #[tokio::test]
    async fn volume_is_dropped_for_close_only_requests() {
        let series = adapter(FixtureHttpClient::new().with_json("fsym=ETH", BODY))
            .daily_history(Asset::Eth, 3, false)
            .await
            .expect("history");
        assert!(!series.has_volume());
    }

    #[tokio::test]
    async fn api_error_body_is_malformed() {
        let body = r#"{"Response":"Error","Message":"fsym param is invalid","Data":{}}"#;
        let error = adapter(FixtureHttpClient::new().with_json("histoday", body))
            .daily_history(Asset::Btc, 10, true)
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), FeedErrorKind::Malformed);
        assert!(error.message().contains("fsym param is invalid"));
    }

    #[tokio::test]
    async fn negative_close_is_rejected_not_repaired() {
        let body = r#"{"Response":"Success","Data":{"Data":[
            {"time": 1704067200, "close": 10.0},
            {"time": 1704153600, "close": -1.0}
        ]}}"#;
        let error = adapter(FixtureHttpClient::new().with_json("histoday", body))
            .daily_history(Asset::Btc, 2, false)
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), FeedErrorKind::Malformed);
    }

    #[test]
    fn builds_histoday_url() {
        let url = adapter(FixtureHttpClient::new()).history_url(Asset::Eth, 2000);
        assert_eq!(
            url,
            "https://min-api.cryptocompare.com/data/v2/histoday?fsym=ETH&tsym=USD&limit=2000&aggregate=1"
        );
    }
}
