use coinlens_core::indicators::{self, IndicatorWindows};
use coinlens_feeds::{Asset, MarketFeeds};
use serde_json::json;

use super::{local_rate, CommandResult};
use crate::cli::IndicatorsArgs;
use crate::config::AppConfig;
use crate::error::CliError;

pub async fn run(
    args: &IndicatorsArgs,
    config: &AppConfig,
    feeds: &MarketFeeds,
) -> Result<CommandResult, CliError> {
    let asset = Asset::from(args.asset);
    let (series, (rate, currency, spot_error)) =
        tokio::join!(feeds.history(asset, false), local_rate(feeds));
    let series = series?;

    let computed = indicators::compute(&series, IndicatorWindows::from(&config.analytics))?;
    let converted = rate.indicators(&computed);
    let rows = converted.rows();
    let skip = args.tail.map_or(0, |tail| rows.len().saturating_sub(tail));

    let mut result = CommandResult::ok(json!({
        "asset": asset,
        "currency": currency,
        "exchange_rate": rate,
        "windows": converted.windows(),
        "rows": &rows[skip..],
    }));
    if let Some(error) = spot_error {
        result = result
            .with_warning("values are in USD: spot quote unavailable")
            .with_errors(vec![error]);
    }

    Ok(result)
}
