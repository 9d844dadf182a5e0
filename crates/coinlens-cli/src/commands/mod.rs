mod dashboard;
mod forecast;
mod indicators;
mod summary;

use std::time::Instant;

use coinlens_core::{
    AnalyticsConfig, AnalyticsError, Dashboard, DashboardInputs, ForecastAdapter,
    ForecastSeries, ForecastSettings, Forecaster, HoltLinear, LinearTrend, Normalizer,
    PriceSeries, SectionFailure, TradingDate, QUOTE_CURRENCY,
};
use coinlens_feeds::{FeedError, FeedFailure, FeedId, MarketData, MarketFeeds};
use serde_json::Value;
use tracing::warn;

use crate::cli::{Cli, Command, ForecasterChoice};
use crate::config::AppConfig;
use crate::envelope::{Envelope, EnvelopeError};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    /// Human-readable rendering used by the table format.
    pub text: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            text: None,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_section_failures(mut self, failures: &[SectionFailure]) -> Self {
        self.warnings.extend(failures.iter().map(|failure| {
            format!(
                "{}: {} ({})",
                failure.section.as_str(),
                failure.message,
                failure.code
            )
        }));
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Envelope plus the optional text view of a finished command.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub text: Option<String>,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let started = Instant::now();
    let config = AppConfig::resolve(cli)?;
    let feeds = if cli.offline {
        MarketFeeds::offline(&config.feeds, TradingDate::today())
    } else {
        MarketFeeds::new(&config.feeds)
    };

    let result = match &cli.command {
        Command::Dashboard(args) => dashboard::run(args, config, &feeds).await?,
        Command::Indicators(args) => indicators::run(args, &config, &feeds).await?,
        Command::Forecast(args) => forecast::run(args, config, &feeds).await?,
        Command::Summary(args) => summary::run(args, &config, &feeds).await?,
    };

    let CommandResult {
        data,
        text,
        warnings,
        errors,
    } = result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(feeds.sources(), latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    Ok(CommandOutput {
        envelope: Envelope {
            meta: metadata.into_envelope_meta(),
            data,
            errors,
        },
        text,
    })
}

pub(crate) fn feed_errors(data: &MarketData) -> Vec<EnvelopeError> {
    data.failures.iter().map(EnvelopeError::from).collect()
}

/// Builds the dashboard with the chosen forecaster.
pub(crate) fn assemble_dashboard(
    data: &MarketData,
    range: Option<(TradingDate, TradingDate)>,
    choice: ForecasterChoice,
    config: &AnalyticsConfig,
) -> Result<Dashboard, AnalyticsError> {
    fn with<F: Forecaster>(
        data: &MarketData,
        range: Option<(TradingDate, TradingDate)>,
        forecaster: F,
        config: &AnalyticsConfig,
    ) -> Result<Dashboard, AnalyticsError> {
        Dashboard::assemble(
            DashboardInputs {
                primary: &data.primary,
                comparison: data.comparison.as_ref(),
                snapshot: &data.snapshot,
                range,
                forecaster,
            },
            config,
        )
    }

    match choice {
        ForecasterChoice::Holt => with(
            data,
            range,
            HoltLinear::with_interval_width(config.interval_width),
            config,
        ),
        ForecasterChoice::Linear => with(
            data,
            range,
            LinearTrend {
                interval_width: config.interval_width,
            },
            config,
        ),
    }
}

pub(crate) fn run_forecast(
    series: &PriceSeries,
    choice: ForecasterChoice,
    config: &AnalyticsConfig,
) -> Result<(ForecastSeries, &'static str), AnalyticsError> {
    fn with<F: Forecaster>(
        series: &PriceSeries,
        forecaster: F,
        config: &AnalyticsConfig,
    ) -> Result<(ForecastSeries, &'static str), AnalyticsError> {
        let name = forecaster.name();
        let adapter = ForecastAdapter::new(forecaster, ForecastSettings::from(config));
        Ok((adapter.run(series)?, name))
    }

    match choice {
        ForecasterChoice::Holt => with(
            series,
            HoltLinear::with_interval_width(config.interval_width),
            config,
        ),
        ForecasterChoice::Linear => with(
            series,
            LinearTrend {
                interval_width: config.interval_width,
            },
            config,
        ),
    }
}

/// Local-currency normalizer from the spot quote, or the quote currency
/// when it is missing.
pub(crate) async fn local_rate(
    feeds: &MarketFeeds,
) -> (Normalizer, String, Option<EnvelopeError>) {
    let quote = feeds.spot().await.and_then(|quote| {
        Normalizer::exchange_rate(quote.usd_local)
            .map(|rate| (rate, quote.local_currency))
            .map_err(|error| FeedError::malformed(FeedId::CoinGecko, error.to_string()))
    });

    match quote {
        Ok((rate, currency)) => (rate, currency, None),
        Err(error) => {
            warn!(
                code = error.code(),
                error = %error,
                "spot quote unavailable; staying in {QUOTE_CURRENCY}"
            );
            let failure = FeedFailure {
                piece: "spot",
                error,
            };
            (
                Normalizer::identity(),
                QUOTE_CURRENCY.to_owned(),
                Some(EnvelopeError::from(&failure)),
            )
        }
    }
}
