use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, TradingDate, ValidationError};

/// Point estimate with its uncertainty band for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: TradingDate,
    pub estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    pub fn new(
        date: TradingDate,
        estimate: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<Self, ValidationError> {
        let point = Self {
            date,
            estimate,
            lower_bound,
            upper_bound,
        };
        point.validate()?;
        Ok(point)
    }

    /// Symmetric band of `half_width` around `estimate`.
    pub fn symmetric(
        date: TradingDate,
        estimate: f64,
        half_width: f64,
    ) -> Result<Self, ValidationError> {
        let half_width = half_width.abs();
        Self::new(date, estimate, estimate - half_width, estimate + half_width)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("estimate", self.estimate),
            ("lower_bound", self.lower_bound),
            ("upper_bound", self.upper_bound),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }

        if !(self.lower_bound <= self.estimate && self.estimate <= self.upper_bound) {
            return Err(ValidationError::UnorderedBounds {
                date: self.date,
                lower: self.lower_bound,
                estimate: self.estimate,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}

/// Mean estimate and mean bounds over a set of forecast points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastAverages {
    pub estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Forecast covering the fitted history followed by the future horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForecastSeriesRecord")]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
    history_len: usize,
}

#[derive(Deserialize)]
struct ForecastSeriesRecord {
    points: Vec<ForecastPoint>,
    history_len: usize,
}

impl TryFrom<ForecastSeriesRecord> for ForecastSeries {
    type Error = AnalyticsError;

    fn try_from(record: ForecastSeriesRecord) -> Result<Self, Self::Error> {
        Self::new(record.points, record.history_len)
    }
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>, history_len: usize) -> Result<Self, AnalyticsError> {
        if history_len > points.len() {
            return Err(AnalyticsError::contract(format!(
                "history length {history_len} exceeds {} forecast points",
                points.len()
            )));
        }

        for point in &points {
            point.validate().map_err(|error| AnalyticsError::contract(error.to_string()))?;
        }

        if let Some(index) = points.windows(2).position(|pair| pair[0].date >= pair[1].date) {
            return Err(AnalyticsError::contract(format!(
                "forecast dates must strictly increase (index {})",
                index + 1
            )));
        }

        Ok(Self {
            points,
            history_len,
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// In-sample fitted values.
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len]
    }

    /// Points after the last observed date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len..]
    }

    pub fn horizon_days(&self) -> usize {
        self.points.len() - self.history_len
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Averages over the future horizon; `None` when the horizon is empty.
    pub fn future_averages(&self) -> Option<ForecastAverages> {
        let future = self.future();
        if future.is_empty() {
            return None;
        }
        let count = future.len() as f64;
        let (estimate, lower_bound, upper_bound) =
            future.iter().fold((0.0, 0.0, 0.0), |(e, l, u), point| {
                (
                    e + point.estimate,
                    l + point.lower_bound,
                    u + point.upper_bound,
                )
            });
        Some(ForecastAverages {
            estimate: estimate / count,
            lower_bound: lower_bound / count,
            upper_bound: upper_bound / count,
        })
    }

    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, ValidationError> {
        let points = self
            .points
            .iter()
            .map(|point| {
                ForecastPoint::new(
                    point.date,
                    point.estimate * factor,
                    point.lower_bound * factor,
                    point.upper_bound * factor,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            points,
            history_len: self.history_len,
        })
    }
}
