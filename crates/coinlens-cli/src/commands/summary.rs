use coinlens_core::render_summary;
use coinlens_feeds::MarketFeeds;
use serde_json::json;

use super::{assemble_dashboard, feed_errors, CommandResult};
use crate::cli::SummaryArgs;
use crate::config::AppConfig;
use crate::error::CliError;

pub async fn run(
    args: &SummaryArgs,
    config: &AppConfig,
    feeds: &MarketFeeds,
) -> Result<CommandResult, CliError> {
    let data = feeds.market_data(None).await?;
    let dashboard = assemble_dashboard(&data, None, args.forecaster, &config.analytics)?;
    let text = render_summary(&dashboard);

    Ok(CommandResult::ok(json!({
        "currency": dashboard.currency,
        "degraded": dashboard.is_degraded(),
        "text": text,
    }))
    .with_text(text)
    .with_section_failures(&dashboard.failures)
    .with_errors(feed_errors(&data)))
}
