//! Deterministic synthetic payloads for every upstream endpoint.
//!
//! Offline mode runs the regular adapters against a [`FixtureHttpClient`]
//! loaded with these bodies, so the decoding path is the same as online.

use coinlens_core::{TradingDate, QUOTE_CURRENCY};
use serde_json::{json, Value};

use crate::http_client::FixtureHttpClient;
use crate::{Asset, FeedConfig};

const SECONDS_PER_DAY: i64 = 86_400;
const SYNTHETIC_USD_LOCAL: f64 = 5.4;
const SYNTHETIC_GOLD_USD: f64 = 2_350.0;
const SYNTHETIC_DOMINANCE: f64 = 54.0;

/// Fixture client answering every feed with synthetic data whose history
/// ends on `anchor`.
pub fn synthetic_client(config: &FeedConfig, anchor: TradingDate) -> FixtureHttpClient {
    let days = config.history_limit + 1;
    let btc_last = synthetic_close(Asset::Btc, days - 1);
    let quote = QUOTE_CURRENCY.to_ascii_lowercase();
    let local = config.local_currency.to_ascii_lowercase();

    FixtureHttpClient::new()
        .with_json("fsym=BTC", histoday_body(Asset::Btc, anchor, days).to_string())
        .with_json("fsym=ETH", histoday_body(Asset::Eth, anchor, days).to_string())
        .with_json(
            "ids=bitcoin",
            json!({ "bitcoin": { quote.as_str(): btc_last, local.as_str(): btc_last * SYNTHETIC_USD_LOCAL } })
                .to_string(),
        )
        .with_json(
            "ids=tether-gold",
            json!({ "tether-gold": { quote.as_str(): SYNTHETIC_GOLD_USD } }).to_string(),
        )
        .with_json(
            "/api/v3/global",
            json!({ "data": { "market_cap_percentage": { "btc": SYNTHETIC_DOMINANCE } } })
                .to_string(),
        )
        .with_json(
            "/fng/",
            json!({
                "name": "Fear and Greed Index",
                "data": [{ "value": "62", "value_classification": "Greed" }],
                "metadata": { "error": null }
            })
            .to_string(),
        )
}

/// Smooth trend with a slow cycle; strictly positive for any index.
pub fn synthetic_close(asset: Asset, index: usize) -> f64 {
    let i = index as f64;
    match asset {
        Asset::Btc => 30_000.0 + 15.0 * i + 2_500.0 * (i / 45.0).sin(),
        Asset::Eth => 1_800.0 + 0.8 * i + 150.0 * (i / 30.0 + 1.0).sin(),
    }
}

fn histoday_body(asset: Asset, anchor: TradingDate, days: usize) -> Value {
    let anchor_ts = unix_midnight(anchor);
    let bars: Vec<Value> = (0..days)
        .map(|index| {
            let close = synthetic_close(asset, index);
            let age = (days - 1 - index) as i64;
            let turnover = 900.0 + ((index * 37) % 400) as f64;
            json!({
                "time": anchor_ts - age * SECONDS_PER_DAY,
                "close": close,
                "volumeto": close * turnover,
            })
        })
        .collect();

    json!({
        "Response": "Success",
        "Message": "",
        "Data": { "Aggregated": false, "Data": bars }
    })
}

fn unix_midnight(date: TradingDate) -> i64 {
    let epoch = TradingDate::from_unix_timestamp(0);
    epoch.map_or(0, |epoch| epoch.days_until(date) * SECONDS_PER_DAY)
}
