//! # Coinlens Core
//!
//! Analytics for daily crypto-asset price histories.
//!
//! ## Overview
//!
//! - **Indicator engine**: short/long simple moving averages, RSI and the
//!   Mayer Multiple, computed in one O(L) pass per column
//! - **Forecast adapter**: runs any [`Forecaster`] over a series and checks
//!   its output against the horizon and bound-ordering contract
//! - **Normalizer**: a single scale factor for exchange rates and the
//!   troy-ounce to gram conversion
//! - **Dashboard**: assembles the above with a [`MarketSnapshot`] into one
//!   renderable value, degrading per section on missing inputs
//!
//! Nothing here performs I/O. Price histories and snapshots are fetched by
//! `coinlens-feeds`; every transform takes its parameters explicitly.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | [`AnalyticsConfig`] windows, horizon and constants |
//! | [`dashboard`] | [`Dashboard`] assembly |
//! | [`domain`] | Dates, price/forecast series, market snapshot |
//! | [`error`] | [`ValidationError`], [`AnalyticsError`] |
//! | [`forecast`] | [`Forecaster`] trait, adapter, Holt and linear models |
//! | [`indicators`] | Moving averages, RSI, Mayer Multiple |
//! | [`normalize`] | Currency and unit conversion |
//! | [`report`] | Plain-text narrative summary |
//! | [`stats`] | Range statistics |
//!
//! ## Error Handling
//!
//! ```rust
//! use coinlens_core::{AnalyticsError, ForecastAdapter, ForecastSettings, HoltLinear, PriceSeries, TradingDate};
//!
//! let start = TradingDate::parse("2024-01-01").unwrap();
//! let series = PriceSeries::from_daily_closes(start, [100.0]).unwrap();
//! let adapter = ForecastAdapter::new(HoltLinear::default(), ForecastSettings::default());
//!
//! match adapter.run(&series) {
//!     Err(AnalyticsError::InsufficientData { required, available, .. }) => {
//!         assert_eq!((required, available), (2, 1));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod normalize;
pub mod report;
pub mod stats;

// Configuration
pub use config::{AnalyticsConfig, GRAMS_PER_TROY_OUNCE, MAX_HORIZON_DAYS};

// Dashboard
pub use dashboard::{
    ChartRow, Dashboard, DashboardInputs, DashboardSection, ForecastSection, SectionFailure,
    SpotMetrics,
};

// Domain models
pub use domain::{
    validate_currency_code, validate_percentage, FearGreed, ForecastAverages, ForecastPoint,
    ForecastSeries, MarketSnapshot, PricePoint, PriceSeries, SpotQuote, TradingDate,
    QUOTE_CURRENCY,
};

// Error types
pub use error::{AnalyticsError, ValidationError};

// Forecasting
pub use forecast::{
    ForecastAdapter, ForecastSettings, Forecaster, HoltLinear, HoltModel, LinearTrend,
    LinearTrendModel, Observation,
};

// Indicators
pub use indicators::{IndicatorRow, IndicatorSeries, IndicatorWindows};

pub use normalize::Normalizer;
pub use report::render_summary;
pub use stats::RangeSummary;
