//! Shared fixtures for the coinlens behavior tests.

pub use coinlens_core::{PriceSeries, TradingDate};

/// Parses a `YYYY-MM-DD` literal.
pub fn date(input: &str) -> TradingDate {
    TradingDate::parse(input).expect("valid test date")
}

/// Gap-free daily series of `closes` starting on 2024-01-01.
pub fn daily_series(closes: impl IntoIterator<Item = f64>) -> PriceSeries {
    PriceSeries::from_daily_closes(date("2024-01-01"), closes).expect("valid test series")
}

/// `len` closes starting at `start` and moving by `step` each day.
pub fn arithmetic_series(start: f64, step: f64, len: usize) -> PriceSeries {
    daily_series((0..len).map(|i| start + step * i as f64))
}

/// Maps arbitrary generated integers onto strictly positive prices.
pub fn positive_closes(raw: &[u16]) -> Vec<f64> {
    raw.iter().map(|value| 1.0 + f64::from(*value) / 10.0).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
