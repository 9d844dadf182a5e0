use thiserror::Error;

use crate::TradingDate;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("unix timestamp {value} is outside the supported date range")]
    TimestampOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be strictly positive")]
    NonPositiveValue { field: &'static str },
    #[error("field '{field}' must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("currency must be a 3-letter ISO code: '{value}'")]
    InvalidCurrency { value: String },
    #[error("exchange rate {stored} does not match the quoted prices ({derived})")]
    InconsistentRate { stored: f64, derived: f64 },

    #[error("window '{name}' must be at least {min}, got {value}")]
    InvalidWindow {
        name: &'static str,
        value: usize,
        min: usize,
    },
    #[error("forecast horizon must be at most {max} days, got {value}")]
    HorizonTooLong { value: usize, max: usize },
    #[error("interval width must be within (0, 1), got {value}")]
    InvalidIntervalWidth { value: f64 },

    #[error("forecast bounds out of order on {date}: lower {lower} <= estimate {estimate} <= upper {upper} does not hold")]
    UnorderedBounds {
        date: TradingDate,
        lower: f64,
        estimate: f64,
        upper: f64,
    },
}

/// Typed failures of the analytics pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("insufficient data for {operation}: need at least {required} points, have {available}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        available: usize,
    },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("forecaster broke the adapter contract: {reason}")]
    ForecastContract { reason: String },

    #[error("forecaster failed: {message}")]
    Forecaster { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AnalyticsError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn contract(reason: impl Into<String>) -> Self {
        Self::ForecastContract {
            reason: reason.into(),
        }
    }

    pub fn forecaster(message: impl Into<String>) -> Self {
        Self::Forecaster {
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "analytics.insufficient_data",
            Self::MalformedInput { .. } => "analytics.malformed_input",
            Self::ForecastContract { .. } => "analytics.forecast_contract",
            Self::Forecaster { .. } => "analytics.forecaster",
            Self::Validation(_) => "analytics.validation",
        }
    }
}
