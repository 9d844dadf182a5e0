//! # Forecast Adapter
//!
//! Shapes a [`PriceSeries`] into the `(date, value)` observations a
//! [`Forecaster`] consumes, invokes `fit`/`predict`, and checks the result
//! against the adapter contract:
//!
//! - the fitted part covers exactly the observed dates, in order;
//! - the future part covers `horizon_days` consecutive days after the last
//!   observation;
//! - every point satisfies `lower_bound <= estimate <= upper_bound`.
//!
//! The forecasting math lives behind the trait. Two implementations ship
//! with the crate: [`HoltLinear`] and [`LinearTrend`].
//!
//! ```rust,ignore
//! use coinlens_core::{ForecastAdapter, ForecastSettings, HoltLinear};
//!
//! let adapter = ForecastAdapter::new(HoltLinear::default(), ForecastSettings::default());
//! let forecast = adapter.run(&series)?;
//! for point in forecast.future() {
//!     println!("{} {:.2} [{:.2}, {:.2}]", point.date, point.estimate, point.lower_bound, point.upper_bound);
//! }
//! ```

mod holt;
mod interval;
mod linear;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AnalyticsConfig, AnalyticsError, ForecastSeries, PricePoint, PriceSeries, TradingDate};

pub use self::holt::{HoltLinear, HoltModel};
pub use self::interval::normal_multiplier;
pub use self::linear::{LinearTrend, LinearTrendModel};

/// Forecaster input: one observed value per date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: TradingDate,
    pub value: f64,
}

/// Opaque univariate forecasting capability.
///
/// `predict` must return the fitted history followed by `horizon_days`
/// future points; [`ForecastAdapter`] rejects anything else.
pub trait Forecaster {
    type Model;

    /// Short identifier used in logs and output metadata.
    fn name(&self) -> &'static str;

    fn fit(&self, history: &[Observation]) -> Result<Self::Model, AnalyticsError>;

    fn predict(
        &self,
        model: &Self::Model,
        horizon_days: usize,
    ) -> Result<ForecastSeries, AnalyticsError>;
}

/// Horizon bookkeeping for the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub horizon_days: usize,
    pub min_history: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for ForecastSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            horizon_days: config.horizon_days,
            min_history: config.min_forecast_history.max(2),
        }
    }
}

/// Runs a [`Forecaster`] over a price series.
#[derive(Debug, Clone)]
pub struct ForecastAdapter<F> {
    forecaster: F,
    settings: ForecastSettings,
}

impl<F: Forecaster> ForecastAdapter<F> {
    pub fn new(forecaster: F, settings: ForecastSettings) -> Self {
        Self {
            forecaster,
            settings,
        }
    }

    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    pub fn settings(&self) -> ForecastSettings {
        self.settings
    }

    /// Fits on `series` and predicts `horizon_days` past its last date.
    ///
    /// A series shorter than `min_history` fails with
    /// [`AnalyticsError::InsufficientData`], and a horizon that runs past
    /// the calendar with [`AnalyticsError::MalformedInput`], both before
    /// the forecaster is touched.
    pub fn run(&self, series: &PriceSeries) -> Result<ForecastSeries, AnalyticsError> {
        let min_history = self.settings.min_history.max(2);
        if series.len() < min_history {
            return Err(AnalyticsError::InsufficientData {
                operation: "forecast",
                required: min_history,
                available: series.len(),
            });
        }

        let observations = to_observations(series.points())?;
        horizon_end(last_date(&observations)?, self.settings.horizon_days)?;
        debug!(
            forecaster = self.forecaster.name(),
            observations = observations.len(),
            horizon_days = self.settings.horizon_days,
            "fitting forecaster"
        );

        let model = self.forecaster.fit(&observations)?;
        let forecast = self.forecaster.predict(&model, self.settings.horizon_days)?;
        self.check_contract(&observations, &forecast)?;

        debug!(
            forecaster = self.forecaster.name(),
            points = forecast.len(),
            "forecast accepted"
        );
        Ok(forecast)
    }

    fn check_contract(
        &self,
        observations: &[Observation],
        forecast: &ForecastSeries,
    ) -> Result<(), AnalyticsError> {
        let history = forecast.history();
        if history.len() != observations.len() {
            return Err(AnalyticsError::contract(format!(
                "fitted history has {} points, expected {}",
                history.len(),
                observations.len()
            )));
        }
        if let Some(index) = history
            .iter()
            .zip(observations)
            .position(|(point, observation)| point.date != observation.date)
        {
            return Err(AnalyticsError::contract(format!(
                "fitted date at index {index} does not match the observed date"
            )));
        }

        let expected = future_dates(last_date(observations)?, self.settings.horizon_days)?;
        let future = forecast.future();
        if future.len() != expected.len() {
            return Err(AnalyticsError::contract(format!(
                "forecast horizon has {} days, expected {}",
                future.len(),
                expected.len()
            )));
        }
        if future
            .iter()
            .zip(&expected)
            .any(|(point, date)| point.date != *date)
        {
            return Err(AnalyticsError::contract(
                "future dates must be the consecutive days after the last observation",
            ));
        }

        Ok(())
    }
}

/// Reshapes price points into forecaster observations.
///
/// Unordered or duplicate dates are a precondition failure of the caller
/// and are reported, never repaired.
pub fn to_observations(points: &[PricePoint]) -> Result<Vec<Observation>, AnalyticsError> {
    if let Some(index) = points.windows(2).position(|pair| pair[0].date >= pair[1].date) {
        return Err(AnalyticsError::malformed(format!(
            "forecast input must be strictly increasing by date (index {})",
            index + 1
        )));
    }

    Ok(points
        .iter()
        .map(|point| Observation {
            date: point.date,
            value: point.close,
        })
        .collect())
}

/// Last date of a `horizon_days` forecast after `last`.
pub fn horizon_end(last: TradingDate, horizon_days: usize) -> Result<TradingDate, AnalyticsError> {
    i64::try_from(horizon_days)
        .ok()
        .and_then(|days| last.add_days(days))
        .ok_or_else(|| {
            AnalyticsError::malformed(format!("{last} + {horizon_days} days leaves the calendar"))
        })
}

/// The `horizon_days` consecutive dates following `last`.
pub fn future_dates(last: TradingDate, horizon_days: usize) -> Result<Vec<TradingDate>, AnalyticsError> {
    horizon_end(last, horizon_days)?;
    (1..=horizon_days)
        .map(|offset| {
            i64::try_from(offset)
                .ok()
                .and_then(|days| last.add_days(days))
                .ok_or_else(|| {
                    AnalyticsError::malformed(format!("{last} + {offset} days leaves the calendar"))
                })
        })
        .collect()
}

pub(crate) fn last_date(observations: &[Observation]) -> Result<TradingDate, AnalyticsError> {
    observations
        .last()
        .map(|observation| observation.date)
        .ok_or(AnalyticsError::InsufficientData {
            operation: "forecast",
            required: 1,
            available: 0,
        })
}

pub(crate) fn require_history(
    observations: &[Observation],
    required: usize,
) -> Result<(), AnalyticsError> {
    if observations.len() < required {
        return Err(AnalyticsError::InsufficientData {
            operation: "forecast fit",
            required,
            available: observations.len(),
        });
    }
    Ok(())
}
