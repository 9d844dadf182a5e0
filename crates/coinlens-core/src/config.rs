//! Explicit parameters for every analytics transform.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exact number of grams in one troy ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.103_476_8;

/// Longest forecast horizon a config may request.
pub const MAX_HORIZON_DAYS: usize = 3_650;

/// Window sizes, horizon and conversion constants used by the pipeline.
///
/// Unknown keys are rejected when deserializing so that typos in a config
/// file surface instead of silently falling back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub rsi_window: usize,
    pub horizon_days: usize,
    pub min_forecast_history: usize,
    /// Coverage of the forecast band, e.g. `0.8` for an 80% interval.
    pub interval_width: f64,
    pub grams_per_troy_ounce: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
            rsi_window: 14,
            horizon_days: 30,
            min_forecast_history: 2,
            interval_width: 0.8,
            grams_per_troy_ounce: GRAMS_PER_TROY_OUNCE,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value, min) in [
            ("short_window", self.short_window, 1),
            ("long_window", self.long_window, 1),
            ("rsi_window", self.rsi_window, 1),
            ("min_forecast_history", self.min_forecast_history, 2),
        ] {
            if value < min {
                return Err(ValidationError::InvalidWindow { name, value, min });
            }
        }

        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(ValidationError::HorizonTooLong {
                value: self.horizon_days,
                max: MAX_HORIZON_DAYS,
            });
        }

        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ValidationError::InvalidIntervalWidth {
                value: self.interval_width,
            });
        }

        crate::domain::validate_positive("grams_per_troy_ounce", self.grams_per_troy_ounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_dashboard() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.short_window, 50);
        assert_eq!(config.long_window, 200);
        assert_eq!(config.rsi_window, 14);
        assert_eq!(config.horizon_days, 30);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalyticsConfig =
            serde_json::from_str(r#"{"horizon_days": 7}"#).expect("parses");
        assert_eq!(config.horizon_days, 7);
        assert_eq!(config.long_window, 200);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<AnalyticsConfig>(r#"{"horizon": 7}"#).is_err());
    }

    #[test]
    fn rejects_degenerate_forecast_minimum() {
        let config = AnalyticsConfig {
            min_forecast_history: 1,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWindow {
                name: "min_forecast_history",
                ..
            })
        ));
    }

    #[test]
    fn rejects_horizon_past_a_decade() {
        let config = AnalyticsConfig {
            horizon_days: MAX_HORIZON_DAYS + 1,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::HorizonTooLong { max: MAX_HORIZON_DAYS, .. })
        ));

        let config = AnalyticsConfig {
            horizon_days: MAX_HORIZON_DAYS,
            ..AnalyticsConfig::default()
        };
        config.validate().expect("upper bound is inclusive");
    }

    #[test]
    fn rejects_interval_width_outside_unit_range() {
        let config = AnalyticsConfig {
            interval_width: 1.0,
            ..AnalyticsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
