//! # Currency/Unit Normalizer
//!
//! A [`Normalizer`] is a single positive scale factor. Exchange rates and
//! unit conversions are both normalizers, and composing them multiplies
//! their factors, so the order of composition never matters.
//!
//! One normalizer built from the real-time quote is applied to the whole
//! history, the indicators and the forecast bounds alike. No date-varying
//! rate is ever applied retroactively.

use serde::{Deserialize, Serialize};

use crate::domain::validate_positive;
use crate::indicators::IndicatorSeries;
use crate::{ForecastSeries, PriceSeries, ValidationError, GRAMS_PER_TROY_OUNCE};

/// Positive scale factor from a source currency/unit to a target one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Normalizer {
    factor: f64,
}

impl Normalizer {
    pub const fn identity() -> Self {
        Self { factor: 1.0 }
    }

    /// Multiplies source-currency amounts by `rate` (target units per source unit).
    pub fn exchange_rate(rate: f64) -> Result<Self, ValidationError> {
        validate_positive("exchange_rate", rate)?;
        Ok(Self { factor: rate })
    }

    /// Converts a price per troy ounce into a price per gram.
    pub fn per_troy_ounce_to_per_gram(grams_per_ounce: f64) -> Result<Self, ValidationError> {
        validate_positive("grams_per_troy_ounce", grams_per_ounce)?;
        Ok(Self {
            factor: 1.0 / grams_per_ounce,
        })
    }

    /// [`Normalizer::per_troy_ounce_to_per_gram`] with the exact constant.
    pub fn ounce_to_gram() -> Self {
        Self {
            factor: 1.0 / GRAMS_PER_TROY_OUNCE,
        }
    }

    /// Composition of two conversions.
    pub fn then(self, next: Self) -> Self {
        Self {
            factor: self.factor * next.factor,
        }
    }

    pub const fn factor(self) -> f64 {
        self.factor
    }

    pub fn apply(self, value: f64) -> f64 {
        value * self.factor
    }

    pub fn apply_all(self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|value| self.apply(*value)).collect()
    }

    /// Converts closes; volumes are left in their own unit.
    pub fn series(self, series: &PriceSeries) -> Result<PriceSeries, ValidationError> {
        series.scaled(self.factor)
    }

    pub fn forecast(self, forecast: &ForecastSeries) -> Result<ForecastSeries, ValidationError> {
        forecast.scaled(self.factor)
    }

    pub fn indicators(self, indicators: &IndicatorSeries) -> IndicatorSeries {
        indicators.scaled(self.factor)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<f64> for Normalizer {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::exchange_rate(value)
    }
}

impl From<Normalizer> for f64 {
    fn from(value: Normalizer) -> Self {
        value.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDate;

    #[test]
    fn rejects_non_positive_rates() {
        assert!(matches!(
            Normalizer::exchange_rate(0.0),
            Err(ValidationError::NonPositiveValue { .. })
        ));
        assert!(Normalizer::exchange_rate(-5.0).is_err());
        assert!(Normalizer::exchange_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn gold_price_per_gram_in_local_currency() {
        let per_gram_brl = Normalizer::ounce_to_gram()
            .then(Normalizer::exchange_rate(5.0).expect("rate"));
        let value = per_gram_brl.apply(GRAMS_PER_TROY_OUNCE * 100.0);
        assert!((value - 500.0).abs() < 1e-9);
    }

    #[test]
    fn converts_whole_series_with_one_rate() {
        let start = TradingDate::parse("2024-01-01").expect("date");
        let series = PriceSeries::from_daily_closes(start, [10.0, 20.0]).expect("series");
        let converted = Normalizer::exchange_rate(5.5)
            .expect("rate")
            .series(&series)
            .expect("converts");
        assert_eq!(converted.closes(), vec![55.0, 110.0]);
        assert_eq!(series.closes(), vec![10.0, 20.0]);
    }

    #[test]
    fn deserializes_from_plain_number() {
        let normalizer: Normalizer = serde_json::from_str("5.25").expect("parses");
        assert_eq!(normalizer.factor(), 5.25);
        assert!(serde_json::from_str::<Normalizer>("-1").is_err());
    }
}
