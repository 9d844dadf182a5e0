//! # Domain Models
//!
//! Plain data exchanged between ingestion, analytics and presentation.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingDate`] | UTC calendar day |
//! | [`PricePoint`] | Daily close with optional volume |
//! | [`PriceSeries`] | Strictly date-ordered history |
//! | [`ForecastPoint`] | Estimate with lower/upper bound |
//! | [`ForecastSeries`] | Fitted history followed by the future horizon |
//! | [`MarketSnapshot`] | Spot quote, gold, dominance and sentiment |
//!
//! All constructors validate their invariants, so a value that exists is
//! a value the analytics can consume without further checks.

mod date;
mod forecast;
mod market;
mod series;

pub use date::TradingDate;
pub use forecast::{ForecastAverages, ForecastPoint, ForecastSeries};
pub use market::{
    validate_currency_code, validate_percentage, FearGreed, MarketSnapshot, SpotQuote,
    QUOTE_CURRENCY,
};
pub(crate) use market::validate_positive;
pub use series::{PricePoint, PriceSeries};
