use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, PricePoint, PriceSeries, TradingDate};

/// Min/max/mean of closes over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub from: TradingDate,
    pub to: TradingDate,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: f64,
    pub last: f64,
}

impl RangeSummary {
    /// Summarises the points of `series` dated within `[from, to]`.
    pub fn over(
        series: &PriceSeries,
        from: TradingDate,
        to: TradingDate,
    ) -> Result<Self, AnalyticsError> {
        if from > to {
            return Err(AnalyticsError::malformed(format!(
                "range start {from} is after range end {to}"
            )));
        }
        Self::from_points(series.between(from, to), from, to)
    }

    /// Summary of the whole series.
    pub fn full(series: &PriceSeries) -> Result<Self, AnalyticsError> {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => Self::from_points(series.points(), first.date, last.date),
            _ => Err(AnalyticsError::InsufficientData {
                operation: "range summary",
                required: 1,
                available: 0,
            }),
        }
    }

    /// Relative change from the first to the last close in the range.
    pub fn change_pct(&self) -> f64 {
        (self.last / self.first - 1.0) * 100.0
    }

    fn from_points(
        points: &[PricePoint],
        from: TradingDate,
        to: TradingDate,
    ) -> Result<Self, AnalyticsError> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(AnalyticsError::InsufficientData {
                operation: "range summary",
                required: 1,
                available: 0,
            });
        };

        let (min, max, sum) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), point| (min.min(point.close), max.max(point.close), sum + point.close),
        );

        Ok(Self {
            from,
            to,
            count: points.len(),
            min,
            max,
            mean: sum / points.len() as f64,
            first: first.close,
            last: last.close,
        })
    }
}
