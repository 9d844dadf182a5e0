//! # Indicator Engine
//!
//! Pure transforms from a [`PriceSeries`] to a parallel [`IndicatorSeries`]:
//! short and long simple moving averages, RSI and the Mayer Multiple.
//!
//! Every rolling computation is a single pass with a fixed-size running
//! window, so the engine is O(L) in the series length regardless of window
//! sizes. Positions whose window is not yet full hold `None`, which
//! serializes as `null`; no value is ever fabricated for them.
//!
//! ```rust
//! use coinlens_core::{indicators, IndicatorWindows, PriceSeries, TradingDate};
//!
//! let start = TradingDate::parse("2024-01-01").unwrap();
//! let series = PriceSeries::from_daily_closes(start, (1..=5).map(f64::from)).unwrap();
//! let windows = IndicatorWindows { short: 2, long: 3, rsi: 2 };
//! let output = indicators::compute(&series, windows).unwrap();
//!
//! assert_eq!(output.rows()[1].ma_short, Some(1.5));
//! assert_eq!(output.rows()[1].ma_long, None);
//! ```

mod rolling;
mod rsi;

use serde::{Deserialize, Serialize};

use crate::{AnalyticsConfig, PriceSeries, TradingDate, ValidationError};

use self::rolling::RollingWindow;

pub use self::rsi::{relative_strength_index, SATURATED_RSI};

/// Window sizes for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorWindows {
    pub short: usize,
    pub long: usize,
    pub rsi: usize,
}

impl IndicatorWindows {
    pub fn validate(self) -> Result<Self, ValidationError> {
        for (name, value) in [
            ("short_window", self.short),
            ("long_window", self.long),
            ("rsi_window", self.rsi),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidWindow { name, value, min: 1 });
            }
        }
        Ok(self)
    }
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for IndicatorWindows {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            short: config.short_window,
            long: config.long_window,
            rsi: config.rsi_window,
        }
    }
}

/// Derived values for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: TradingDate,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub mayer_multiple: Option<f64>,
}

/// Indicator rows aligned index-for-index with the source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    windows: IndicatorWindows,
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn windows(&self) -> IndicatorWindows {
        self.windows
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose date lies in the inclusive range `[from, to]`.
    pub fn between(&self, from: TradingDate, to: TradingDate) -> &[IndicatorRow] {
        if from > to {
            return &[];
        }
        let start = self.rows.partition_point(|row| row.date < from);
        let end = self.rows.partition_point(|row| row.date <= to);
        &self.rows[start..end]
    }

    /// Moving averages follow the price unit; RSI and the Mayer Multiple are
    /// ratios and stay unchanged.
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| IndicatorRow {
                ma_short: row.ma_short.map(|value| value * factor),
                ma_long: row.ma_long.map(|value| value * factor),
                ..*row
            })
            .collect();
        Self {
            windows: self.windows,
            rows,
        }
    }
}

/// Computes every indicator column for `series`.
///
/// Windows longer than the series are not an error: the affected column is
/// simply undefined everywhere.
pub fn compute(
    series: &PriceSeries,
    windows: IndicatorWindows,
) -> Result<IndicatorSeries, ValidationError> {
    let windows = windows.validate()?;
    let closes = series.closes();

    let ma_short = simple_moving_average(&closes, windows.short);
    let ma_long = simple_moving_average(&closes, windows.long);
    let rsi = relative_strength_index(&closes, windows.rsi);
    let mayer = mayer_multiple(&closes, &ma_long);

    let rows = series
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| IndicatorRow {
            date: point.date,
            ma_short: ma_short[index],
            ma_long: ma_long[index],
            rsi: rsi[index],
            mayer_multiple: mayer[index],
        })
        .collect();

    Ok(IndicatorSeries { windows, rows })
}

/// Trailing simple moving average; defined from index `window - 1` on.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut rolling = RollingWindow::new(window);
    values
        .iter()
        .map(|value| {
            rolling.push(*value);
            rolling.mean()
        })
        .collect()
}

/// Close divided by its long moving average; undefined where the average
/// is undefined or not strictly positive.
pub fn mayer_multiple(closes: &[f64], ma_long: &[Option<f64>]) -> Vec<Option<f64>> {
    closes
        .iter()
        .zip(ma_long)
        .map(|(close, average)| match average {
            Some(average) if *average > 0.0 => Some(close / average),
            _ => None,
        })
        .collect()
}
