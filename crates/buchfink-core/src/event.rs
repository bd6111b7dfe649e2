//! Classified output events.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::asset::AssetRef;

/// Top-level direction of a classified event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Receive,
    Spend,
    Staking,
}

/// Refinement of an [`EventKind`] that the tax engine cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSubtype {
    #[default]
    None,
    Airdrop,
    Reward,
    Mint,
    Income,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Receive => "receive",
            EventKind::Spend => "spend",
            EventKind::Staking => "staking",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for EventSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventSubtype::None => "none",
            EventSubtype::Airdrop => "airdrop",
            EventSubtype::Reward => "reward",
            EventSubtype::Mint => "mint",
            EventSubtype::Income => "income",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receive" => Ok(EventKind::Receive),
            "spend" => Ok(EventKind::Spend),
            "staking" => Ok(EventKind::Staking),
            other => Err(format!("unknown event kind '{other}'")),
        }
    }
}

impl FromStr for EventSubtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(EventSubtype::None),
            "airdrop" => Ok(EventSubtype::Airdrop),
            "reward" => Ok(EventSubtype::Reward),
            "mint" => Ok(EventSubtype::Mint),
            "income" => Ok(EventSubtype::Income),
            other => Err(format!("unknown event subtype '{other}'")),
        }
    }
}

/// A typed, decimal-precise financial event produced by classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub kind: EventKind,
    pub subtype: EventSubtype,
    pub asset: AssetRef,
    /// Always non-negative, already scaled by the asset's decimals.
    /// Serialized as a plain decimal string, e.g. `"0.00000005"`.
    #[serde(with = "plain_decimal")]
    pub amount: BigDecimal,
    /// Block timestamp (Unix seconds)
    pub timestamp: u64,
    /// Transaction hash, lower-case hex without `0x`
    pub link: String,
    #[serde(default)]
    pub notes: String,
    /// Name of the rule that produced this event
    pub rule: String,
}

impl OutputEvent {
    /// The timestamp as a UTC date-time, if it is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.timestamp).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    /// `"<amount> <symbol>"` with trailing zeros stripped, e.g. `"400 UNI"`.
    pub fn display_amount(&self) -> String {
        format!("{} {}", plain_amount(&self.amount), self.asset.symbol)
    }
}

/// Non-scientific, trailing-zero-free rendering: `5E-8` becomes `0.00000005`.
pub fn plain_amount(value: &BigDecimal) -> String {
    strip_trailing_zeros(value).to_plain_string()
}

mod plain_decimal {
    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::plain_amount(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigDecimal::from_str(s.trim()).map_err(de::Error::custom)
    }
}

/// Remove trailing fractional zeros without switching to a negative scale,
/// so `400.000` becomes `400` rather than `4E+2`.
pub fn strip_trailing_zeros(value: &BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}
