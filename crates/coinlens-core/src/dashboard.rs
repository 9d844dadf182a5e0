//! # Dashboard Assembly
//!
//! Combines the price history, the market snapshot and a forecaster into
//! one value that every presentation layer renders from.
//!
//! Analytics run on the USD series. A single [`Normalizer`] built from the
//! spot quote then converts history, indicators and forecast into the
//! local currency; when the rate cannot convert the history, everything
//! stays in USD. Sections whose inputs are missing or whose computation
//! fails are recorded in [`Dashboard::failures`]; the rest of the
//! dashboard is still produced.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::forecast::{ForecastAdapter, ForecastSettings, Forecaster};
use crate::indicators::{self, IndicatorRow, IndicatorWindows};
use crate::{
    AnalyticsConfig, AnalyticsError, FearGreed, ForecastAverages, ForecastPoint, MarketSnapshot,
    Normalizer, PriceSeries, RangeSummary, TradingDate, QUOTE_CURRENCY,
};

/// Everything the dashboard is built from.
#[derive(Debug, Clone)]
pub struct DashboardInputs<'a, F> {
    /// Primary asset history in USD.
    pub primary: &'a PriceSeries,
    /// Optional second asset in USD, shown for comparison.
    pub comparison: Option<&'a PriceSeries>,
    pub snapshot: &'a MarketSnapshot,
    /// Inclusive date filter for the charted rows and range statistics.
    pub range: Option<(TradingDate, TradingDate)>,
    pub forecaster: F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Spot,
    Gold,
    Dominance,
    FearGreed,
    Indicators,
    Range,
    Forecast,
    Comparison,
}

impl DashboardSection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Gold => "gold",
            Self::Dominance => "dominance",
            Self::FearGreed => "fear_greed",
            Self::Indicators => "indicators",
            Self::Range => "range",
            Self::Forecast => "forecast",
            Self::Comparison => "comparison",
        }
    }
}

/// A dashboard section that could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFailure {
    pub section: DashboardSection,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotMetrics {
    pub btc_usd: f64,
    pub btc_local: f64,
}

/// Charted values for one date, prices in the local currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub date: TradingDate,
    pub close: f64,
    pub volume: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub mayer_multiple: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSection {
    pub forecaster: String,
    pub horizon_days: usize,
    pub points: Vec<ForecastPoint>,
    pub averages: Option<ForecastAverages>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub currency: String,
    pub exchange_rate: Normalizer,
    pub spot: Option<SpotMetrics>,
    pub gold_per_gram: Option<f64>,
    pub btc_dominance_pct: Option<f64>,
    pub fear_greed: Option<FearGreed>,
    pub all_time: RangeSummary,
    pub range: Option<RangeSummary>,
    pub latest: Option<IndicatorRow>,
    pub rows: Vec<ChartRow>,
    pub forecast: Option<ForecastSection>,
    pub comparison: Option<PriceSeries>,
    pub failures: Vec<SectionFailure>,
}

impl Dashboard {
    /// Builds the dashboard.
    ///
    /// Fails only when the primary series cannot be summarised at all, the
    /// configuration is invalid, or the date filter is inverted. Every
    /// other problem degrades its own section.
    pub fn assemble<F: Forecaster>(
        inputs: DashboardInputs<'_, F>,
        config: &AnalyticsConfig,
    ) -> Result<Self, AnalyticsError> {
        config.validate()?;
        if let Some((from, to)) = inputs.range {
            if from > to {
                return Err(AnalyticsError::malformed(format!(
                    "date filter start {from} is after end {to}"
                )));
            }
        }

        let mut failures = Vec::new();
        let snapshot = inputs.snapshot;

        let mut normalizer = Normalizer::identity();
        let mut currency = QUOTE_CURRENCY.to_owned();
        let mut spot = None;
        match &snapshot.spot {
            Some(quote) => match Normalizer::exchange_rate(quote.usd_local) {
                Ok(rate) => {
                    normalizer = rate;
                    currency = quote.local_currency.clone();
                    spot = Some(SpotMetrics {
                        btc_usd: quote.btc_usd,
                        btc_local: quote.btc_local,
                    });
                }
                Err(error) => {
                    let error = AnalyticsError::from(error);
                    record(&mut failures, DashboardSection::Spot, error.code(), error.to_string());
                }
            },
            None => record(
                &mut failures,
                DashboardSection::Spot,
                "feed.missing",
                format!("spot quote unavailable; values stay in {QUOTE_CURRENCY}"),
            ),
        }

        let converted = match normalizer.series(inputs.primary) {
            Ok(series) => series,
            Err(error) => {
                let error = AnalyticsError::from(error);
                record(
                    &mut failures,
                    DashboardSection::Spot,
                    error.code(),
                    format!("{error}; values stay in {QUOTE_CURRENCY}"),
                );
                normalizer = Normalizer::identity();
                currency = QUOTE_CURRENCY.to_owned();
                spot = None;
                inputs.primary.clone()
            }
        };

        let gold_per_gram = match snapshot.gold_usd_per_ounce {
            Some(per_ounce) => {
                let per_gram = Normalizer::per_troy_ounce_to_per_gram(config.grams_per_troy_ounce)?
                    .then(normalizer);
                Some(per_gram.apply(per_ounce))
            }
            None => {
                record(&mut failures, DashboardSection::Gold, "feed.missing", "gold price unavailable");
                None
            }
        };
        if snapshot.btc_dominance_pct.is_none() {
            record(
                &mut failures,
                DashboardSection::Dominance,
                "feed.missing",
                "market dominance unavailable",
            );
        }
        if snapshot.fear_greed.is_none() {
            record(
                &mut failures,
                DashboardSection::FearGreed,
                "feed.missing",
                "fear & greed index unavailable",
            );
        }

        let all_time = RangeSummary::full(&converted)?;

        let indicator_series = normalizer.indicators(&indicators::compute(
            inputs.primary,
            IndicatorWindows::from(config),
        )?);
        let latest = indicator_series.latest().copied();
        if latest.map_or(true, |row| row.ma_long.is_none()) {
            record(
                &mut failures,
                DashboardSection::Indicators,
                "analytics.insufficient_data",
                format!(
                    "long moving average needs {} points, have {}",
                    config.long_window,
                    inputs.primary.len()
                ),
            );
        }

        let (from, to) = inputs.range.unwrap_or((all_time.from, all_time.to));
        let range = match RangeSummary::over(&converted, from, to) {
            Ok(summary) => Some(summary),
            Err(error) => {
                record(&mut failures, DashboardSection::Range, error.code(), error.to_string());
                None
            }
        };

        let selected = converted.index_range(from, to);
        let rows = converted.points()[selected.clone()]
            .iter()
            .zip(&indicator_series.rows()[selected])
            .map(|(point, row)| ChartRow {
                date: point.date,
                close: point.close,
                volume: point.volume,
                ma_short: row.ma_short,
                ma_long: row.ma_long,
                rsi: row.rsi,
                mayer_multiple: row.mayer_multiple,
            })
            .collect();

        let forecaster_name = inputs.forecaster.name();
        let adapter = ForecastAdapter::new(inputs.forecaster, ForecastSettings::from(config));
        let forecast = match adapter
            .run(inputs.primary)
            .and_then(|forecast| normalizer.forecast(&forecast).map_err(AnalyticsError::from))
        {
            Ok(forecast) => Some(ForecastSection {
                forecaster: forecaster_name.to_owned(),
                horizon_days: forecast.horizon_days(),
                points: forecast.future().to_vec(),
                averages: forecast.future_averages(),
            }),
            Err(error) => {
                record(&mut failures, DashboardSection::Forecast, error.code(), error.to_string());
                None
            }
        };

        let comparison = match inputs.comparison.map(|series| normalizer.series(series)) {
            Some(Ok(series)) => Some(series),
            Some(Err(error)) => {
                let error = AnalyticsError::from(error);
                record(&mut failures, DashboardSection::Comparison, error.code(), error.to_string());
                None
            }
            None => None,
        };

        debug!(
            currency = %currency,
            rows = inputs.primary.len(),
            failures = failures.len(),
            "dashboard assembled"
        );

        Ok(Self {
            currency,
            exchange_rate: normalizer,
            spot,
            gold_per_gram,
            btc_dominance_pct: snapshot.btc_dominance_pct,
            fear_greed: snapshot.fear_greed.clone(),
            all_time,
            range,
            latest,
            rows,
            forecast,
            comparison,
            failures,
        })
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failure(&self, section: DashboardSection) -> Option<&SectionFailure> {
        self.failures.iter().find(|failure| failure.section == section)
    }
}

fn record(
    failures: &mut Vec<SectionFailure>,
    section: DashboardSection,
    code: &str,
    message: impl Into<String>,
) {
    let message = message.into();
    warn!(section = section.as_str(), code, %message, "dashboard section degraded");
    failures.push(SectionFailure {
        section,
        code: code.to_owned(),
        message,
    });
}
