use coinlens_core::{RangeSummary, TradingDate};
use coinlens_feeds::{Asset, MarketFeeds};

use super::{assemble_dashboard, feed_errors, CommandResult};
use crate::cli::DashboardArgs;
use crate::config::AppConfig;
use crate::error::CliError;

pub async fn run(
    args: &DashboardArgs,
    config: AppConfig,
    feeds: &MarketFeeds,
) -> Result<CommandResult, CliError> {
    let from = args.from.as_deref().map(TradingDate::parse).transpose()?;
    let to = args.to.as_deref().map(TradingDate::parse).transpose()?;
    let config = config.with_horizon(args.horizon)?;

    let data = feeds.market_data(Some(Asset::Eth)).await?;
    let range = match (from, to) {
        (None, None) => None,
        (from, to) => {
            let all_time = RangeSummary::full(&data.primary)?;
            Some((from.unwrap_or(all_time.from), to.unwrap_or(all_time.to)))
        }
    };

    let dashboard = assemble_dashboard(&data, range, args.forecaster, &config.analytics)?;
    let mut result = CommandResult::ok(serde_json::to_value(&dashboard)?)
        .with_section_failures(&dashboard.failures)
        .with_errors(feed_errors(&data));
    if data.primary.len() < config.analytics.long_window {
        result = result.with_warning(format!(
            "history has {} days; fewer than the {}-day long window",
            data.primary.len(),
            config.analytics.long_window
        ));
    }

    Ok(result)
}
