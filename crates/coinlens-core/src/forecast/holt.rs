use serde::{Deserialize, Serialize};

use super::{future_dates, last_date, normal_multiplier, require_history, Forecaster, Observation};
use crate::{AnalyticsError, ForecastPoint, ForecastSeries, TradingDate, ValidationError};

/// Holt's linear-trend exponential smoothing.
///
/// Observations are treated as equally spaced steps. Bounds come from the
/// spread of the one-step-ahead in-sample errors and widen with the square
/// root of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoltLinear {
    pub alpha: f64,
    pub beta: f64,
    pub interval_width: f64,
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            interval_width: 0.8,
        }
    }
}

impl HoltLinear {
    pub fn with_interval_width(interval_width: f64) -> Self {
        Self {
            interval_width,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<f64, ValidationError> {
        for (field, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        normal_multiplier(self.interval_width)
    }
}

/// Fitted smoothing state.
#[derive(Debug, Clone, PartialEq)]
pub struct HoltModel {
    pub level: f64,
    pub trend: f64,
    pub residual_scale: f64,
    multiplier: f64,
    fitted: Vec<(TradingDate, f64)>,
    last_date: TradingDate,
}

impl Forecaster for HoltLinear {
    type Model = HoltModel;

    fn name(&self) -> &'static str {
        "holt"
    }

    fn fit(&self, history: &[Observation]) -> Result<HoltModel, AnalyticsError> {
        let multiplier = self.validate()?;
        require_history(history, 2)?;

        let mut level = history[0].value;
        let mut trend = history[1].value - history[0].value;
        let mut fitted = Vec::with_capacity(history.len());
        fitted.push((history[0].date, history[0].value));

        let mut squared_error = 0.0;
        for observation in &history[1..] {
            let one_step = level + trend;
            fitted.push((observation.date, one_step));
            squared_error += (observation.value - one_step).powi(2);

            let previous_level = level;
            level = self.alpha * observation.value + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
        }

        let residual_scale = (squared_error / (history.len() - 1) as f64).sqrt();
        if !(level.is_finite() && trend.is_finite() && residual_scale.is_finite()) {
            return Err(AnalyticsError::forecaster("holt smoothing diverged"));
        }

        Ok(HoltModel {
            level,
            trend,
            residual_scale,
            multiplier,
            fitted,
            last_date: last_date(history)?,
        })
    }

    fn predict(
        &self,
        model: &HoltModel,
        horizon_days: usize,
    ) -> Result<ForecastSeries, AnalyticsError> {
        let in_sample_width = model.multiplier * model.residual_scale;
        let future = future_dates(model.last_date, horizon_days)?;
        let mut points = Vec::with_capacity(model.fitted.len() + future.len());
        for (date, value) in &model.fitted {
            points.push(ForecastPoint::symmetric(*date, *value, in_sample_width)?);
        }

        for (step, date) in future.into_iter().enumerate() {
            let steps_ahead = (step + 1) as f64;
            let estimate = model.level + steps_ahead * model.trend;
            let width = in_sample_width * steps_ahead.sqrt();
            points.push(ForecastPoint::symmetric(date, estimate, width)?);
        }

        ForecastSeries::new(points, model.fitted.len())
    }
}
