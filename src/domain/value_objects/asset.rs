//! # Asset and Trading Enums
//!
//! Enumerated domain types: the tradeable [`Asset`], the advertisement
//! [`TradeSide`], and the [`PaymentMethod`] accepted for fiat settlement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tradeable crypto asset.
///
/// Immutable identity; the set is fixed at compile time.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::asset::Asset;
///
/// let asset: Asset = "USDT".parse().unwrap();
/// assert_eq!(asset, Asset::Usdt);
/// assert_eq!(asset.symbol(), "USDT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Asset {
    /// Tether USD stablecoin.
    Usdt,
    /// Bitcoin.
    Btc,
    /// Ether.
    Eth,
}

impl Asset {
    /// All supported assets, in listing order.
    pub const ALL: [Self; 3] = [Self::Usdt, Self::Btc, Self::Eth];

    /// Returns the canonical ticker symbol.
    #[inline]
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Usdt => "USDT",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error returned when parsing an unknown asset symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAssetError(pub String);

impl fmt::Display for UnknownAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset symbol: {}", self.0)
    }
}

impl std::error::Error for UnknownAssetError {}

impl FromStr for Asset {
    type Err = UnknownAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USDT" => Ok(Self::Usdt),
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            other => Err(UnknownAssetError(other.to_string())),
        }
    }
}

/// Side of an advertisement from the poster's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    /// The poster buys crypto for fiat.
    Buy,
    /// The poster sells crypto for fiat.
    Sell,
}

impl TradeSide {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        };
        write!(f, "{}", s)
    }
}

/// A fiat payment method accepted by an advertisement.
///
/// Stored as an opaque label ("UPI", "IMPS", "Bank Transfer"); validation
/// of the underlying rails is external.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Creates a payment method label.
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentMethod {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
