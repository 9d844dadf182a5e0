use coinlens_feeds::{Asset, MarketFeeds};
use serde_json::json;

use super::{local_rate, run_forecast, CommandResult};
use crate::cli::ForecastArgs;
use crate::config::AppConfig;
use crate::error::CliError;

pub async fn run(
    args: &ForecastArgs,
    config: AppConfig,
    feeds: &MarketFeeds,
) -> Result<CommandResult, CliError> {
    let config = config.with_horizon(args.horizon)?;
    let (series, (rate, currency, spot_error)) =
        tokio::join!(feeds.history(Asset::Btc, false), local_rate(feeds));
    let series = series?;

    let (forecast, forecaster) = run_forecast(&series, args.forecaster, &config.analytics)?;
    let forecast = rate.forecast(&forecast)?;
    let points = if args.all {
        forecast.points()
    } else {
        forecast.future()
    };

    let mut result = CommandResult::ok(json!({
        "forecaster": forecaster,
        "currency": currency,
        "history_days": forecast.history().len(),
        "horizon_days": forecast.horizon_days(),
        "averages": forecast.future_averages(),
        "points": points,
    }));
    if let Some(error) = spot_error {
        result = result
            .with_warning("values are in USD: spot quote unavailable")
            .with_errors(vec![error]);
    }

    Ok(result)
}
