use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upstream services a feed talks to; used in metadata and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedId {
    CryptoCompare,
    CoinGecko,
    AlternativeMe,
    Offline,
}

impl FeedId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CryptoCompare => "cryptocompare",
            Self::CoinGecko => "coingecko",
            Self::AlternativeMe => "alternative_me",
            Self::Offline => "offline",
        }
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crypto assets with daily history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Btc,
    Eth,
}

impl Asset {
    pub const ALL: [Self; 2] = [Self::Btc, Self::Eth];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }

    /// CoinGecko coin id.
    pub const fn coin_id(self) -> &'static str {
        match self {
            Self::Btc => "bitcoin",
            Self::Eth => "ethereum",
        }
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(Self::Btc),
            "eth" | "ethereum" => Ok(Self::Eth),
            other => Err(format!("unsupported asset '{other}' (expected btc or eth)")),
        }
    }
}
