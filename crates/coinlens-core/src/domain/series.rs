use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, TradingDate, ValidationError};

/// One daily observation of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: TradingDate, close: f64, volume: Option<f64>) -> Result<Self, ValidationError> {
        let point = Self {
            date,
            close,
            volume,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.close.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "close" });
        }
        if self.close <= 0.0 {
            return Err(ValidationError::NonPositiveValue { field: "close" });
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "volume" });
            }
            if volume < 0.0 {
                return Err(ValidationError::NegativeValue { field: "volume" });
            }
        }
        Ok(())
    }
}

/// Daily price history ordered by strictly increasing date.
///
/// Missing days are simply absent. The series is immutable once built;
/// every derived computation borrows it and returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates ordering and values. Unordered or duplicate dates are
    /// rejected, never sorted or deduplicated.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AnalyticsError> {
        for (index, point) in points.iter().enumerate() {
            point.validate().map_err(|error| {
                AnalyticsError::malformed(format!("point {index} ({}): {error}", point.date))
            })?;
        }

        if let Some(index) = points.windows(2).position(|pair| pair[0].date >= pair[1].date) {
            let (previous, current) = (points[index].date, points[index + 1].date);
            let reason = if previous == current {
                format!("duplicate date {current} at index {}", index + 1)
            } else {
                format!(
                    "date {current} at index {} is not after {previous}",
                    index + 1
                )
            };
            return Err(AnalyticsError::MalformedInput { reason });
        }

        Ok(Self { points })
    }

    /// Builds a gap-free daily series starting at `start`.
    pub fn from_daily_closes(
        start: TradingDate,
        closes: impl IntoIterator<Item = f64>,
    ) -> Result<Self, AnalyticsError> {
        let mut points = Vec::new();
        for (offset, close) in closes.into_iter().enumerate() {
            let date = start.add_days(offset as i64).ok_or_else(|| {
                AnalyticsError::malformed(format!("day offset {offset} leaves the calendar"))
            })?;
            points.push(PricePoint::new(date, close, None)?);
        }
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn has_volume(&self) -> bool {
        self.points.iter().any(|point| point.volume.is_some())
    }

    /// Points whose date lies in the inclusive range `[from, to]`.
    pub fn between(&self, from: TradingDate, to: TradingDate) -> &[PricePoint] {
        if from > to {
            return &[];
        }
        let start = self.points.partition_point(|point| point.date < from);
        let end = self.points.partition_point(|point| point.date <= to);
        &self.points[start..end]
    }

    /// Index range of [`PriceSeries::between`], for aligning parallel series.
    pub fn index_range(&self, from: TradingDate, to: TradingDate) -> std::ops::Range<usize> {
        if from > to {
            return 0..0;
        }
        let start = self.points.partition_point(|point| point.date < from);
        let end = self.points.partition_point(|point| point.date <= to);
        start..end
    }

    /// Returns a copy with every close multiplied by `factor`.
    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, ValidationError> {
        let points = self
            .points
            .iter()
            .map(|point| PricePoint::new(point.date, point.close * factor, point.volume))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = AnalyticsError;

    fn try_from(value: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(value: PriceSeries) -> Self {
        value.points
    }
}
