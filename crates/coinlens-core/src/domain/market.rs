use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Currency every feed quotes prices in and the analytics run on.
pub const QUOTE_CURRENCY: &str = "USD";

/// Relative tolerance for a stored rate against `btc_local / btc_usd`.
const RATE_TOLERANCE: f64 = 1e-9;

/// Real-time BTC price in USD and a local currency.
///
/// The USD→local rate is derived from the same quote so that every series
/// converted with it stays consistent with the headline price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpotQuoteRecord")]
pub struct SpotQuote {
    pub btc_usd: f64,
    pub btc_local: f64,
    pub local_currency: String,
    pub usd_local: f64,
}

impl SpotQuote {
    pub fn from_prices(
        btc_usd: f64,
        btc_local: f64,
        local_currency: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        validate_positive("btc_usd", btc_usd)?;
        validate_positive("btc_local", btc_local)?;
        let usd_local = btc_local / btc_usd;
        validate_positive("usd_local", usd_local)?;

        Ok(Self {
            btc_usd,
            btc_local,
            local_currency: validate_currency_code(local_currency.as_ref())?,
            usd_local,
        })
    }
}

/// Wire shape of [`SpotQuote`]; the rate is re-derived on the way in.
#[derive(Deserialize)]
struct SpotQuoteRecord {
    btc_usd: f64,
    btc_local: f64,
    local_currency: String,
    #[serde(default)]
    usd_local: Option<f64>,
}

impl TryFrom<SpotQuoteRecord> for SpotQuote {
    type Error = ValidationError;

    fn try_from(record: SpotQuoteRecord) -> Result<Self, Self::Error> {
        let quote = Self::from_prices(record.btc_usd, record.btc_local, &record.local_currency)?;
        if let Some(stored) = record.usd_local {
            if !((stored - quote.usd_local).abs() <= RATE_TOLERANCE * quote.usd_local) {
                return Err(ValidationError::InconsistentRate {
                    stored,
                    derived: quote.usd_local,
                });
            }
        }
        Ok(quote)
    }
}

/// Crypto Fear & Greed index reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreed {
    pub value: u8,
    pub classification: String,
}

impl FearGreed {
    pub fn new(value: u8, classification: impl Into<String>) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::OutOfRange {
                field: "fear_greed",
                value: f64::from(value),
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(Self {
            value,
            classification: classification.into(),
        })
    }
}

/// Point-in-time market facts gathered alongside the price history.
///
/// Each field is fetched independently, so any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub spot: Option<SpotQuote>,
    pub gold_usd_per_ounce: Option<f64>,
    pub btc_dominance_pct: Option<f64>,
    pub fear_greed: Option<FearGreed>,
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

/// Percentages such as market dominance must lie in `[0, 100]`.
pub fn validate_percentage(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(value)
}

pub(crate) fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
