use serde::{Deserialize, Serialize};

use super::{future_dates, normal_multiplier, require_history, Forecaster, Observation};
use crate::{AnalyticsError, ForecastPoint, ForecastSeries, TradingDate};

/// Ordinary least squares trend on calendar days.
///
/// Gaps in the history are honoured: the regressor is the number of days
/// since the first observation. Bounds are the classical prediction
/// interval of a simple linear regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub interval_width: f64,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self {
            interval_width: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearTrendModel {
    pub intercept: f64,
    pub slope: f64,
    pub residual_scale: f64,
    multiplier: f64,
    origin: TradingDate,
    mean_x: f64,
    sxx: f64,
    count: usize,
    dates: Vec<TradingDate>,
}

impl LinearTrendModel {
    fn point_at(&self, date: TradingDate) -> Result<ForecastPoint, AnalyticsError> {
        let x = self.origin.days_until(date) as f64;
        let estimate = self.intercept + self.slope * x;
        let leverage = 1.0 + 1.0 / self.count as f64 + (x - self.mean_x).powi(2) / self.sxx;
        let width = self.multiplier * self.residual_scale * leverage.sqrt();
        Ok(ForecastPoint::symmetric(date, estimate, width)?)
    }
}

impl Forecaster for LinearTrend {
    type Model = LinearTrendModel;

    fn name(&self) -> &'static str {
        "linear"
    }

    fn fit(&self, history: &[Observation]) -> Result<LinearTrendModel, AnalyticsError> {
        let multiplier = normal_multiplier(self.interval_width)?;
        require_history(history, 2)?;

        let origin = history[0].date;
        let count = history.len();
        let xs: Vec<f64> = history
            .iter()
            .map(|obs| origin.days_until(obs.date) as f64)
            .collect();
        let mean_x = xs.iter().sum::<f64>() / count as f64;
        let mean_y = history.iter().map(|obs| obs.value).sum::<f64>() / count as f64;

        let (sxx, sxy) = xs
            .iter()
            .zip(history)
            .fold((0.0, 0.0), |(sxx, sxy), (x, obs)| {
                let dx = x - mean_x;
                (sxx + dx * dx, sxy + dx * (obs.value - mean_y))
            });
        if sxx <= 0.0 {
            return Err(AnalyticsError::forecaster(
                "linear trend needs at least two distinct dates",
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let squared_error: f64 = xs
            .iter()
            .zip(history)
            .map(|(x, obs)| (obs.value - (intercept + slope * x)).powi(2))
            .sum();
        let residual_scale = if count > 2 {
            (squared_error / (count - 2) as f64).sqrt()
        } else {
            0.0
        };

        Ok(LinearTrendModel {
            intercept,
            slope,
            residual_scale,
            multiplier,
            origin,
            mean_x,
            sxx,
            count,
            dates: history.iter().map(|obs| obs.date).collect(),
        })
    }

    fn predict(
        &self,
        model: &LinearTrendModel,
        horizon_days: usize,
    ) -> Result<ForecastSeries, AnalyticsError> {
        let last = model
            .dates
            .last()
            .copied()
            .ok_or_else(|| AnalyticsError::forecaster("linear trend model has no history"))?;

        let future = future_dates(last, horizon_days)?;
        let mut points = Vec::with_capacity(model.dates.len() + future.len());
        for date in &model.dates {
            points.push(model.point_at(*date)?);
        }
        for date in future {
            points.push(model.point_at(date)?);
        }

        ForecastSeries::new(points, model.dates.len())
    }
}
