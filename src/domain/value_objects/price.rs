//! # Price Value Object
//!
//! Unit price in fiat with checked arithmetic.
//!
//! This module provides the [`Price`] type, a type-safe wrapper around
//! [`Decimal`] representing the fiat price of one unit of an asset.
//! Unlike amounts and quantities, a price is strictly positive: a zero
//! unit price would make the fiat-to-quantity conversion meaningless.
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::value_objects::price::Price;
//!
//! let price: Price = "91.45".parse().unwrap();
//! assert!(Price::new(0.0).is_err());
//! ```

use super::arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated unit price.
///
/// # Invariants
///
/// - Price is always > 0
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::price::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::from_decimal(Decimal::new(9145, 2)).unwrap();
/// assert_eq!(price.get(), Decimal::new(9145, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Creates a new price from an f64 value.
    ///
    /// Intended for test fixtures and boundary input; domain code builds
    /// prices from [`Decimal`] via [`Price::from_decimal`].
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is not strictly positive.
    #[must_use = "this returns a Result that should be handled"]
    pub fn new(value: f64) -> ArithmeticResult<Self> {
        let decimal =
            Decimal::try_from(value).map_err(|_| ArithmeticError::InvalidValue("invalid float"))?;
        Self::from_decimal(decimal)
    }

    /// Creates a new price from a Decimal value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is not strictly positive.
    #[must_use = "this returns a Result that should be handled"]
    pub fn from_decimal(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() || value.is_zero() {
            return Err(ArithmeticError::InvalidValue(
                "price must be strictly positive",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the inner Decimal value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Safely multiplies by a Decimal factor.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_mul(self, factor: Decimal) -> ArithmeticResult<Decimal> {
        self.0.safe_mul(factor)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s).map_err(|_| ArithmeticError::InvalidValue("invalid decimal"))?;
        Self::from_decimal(decimal)
    }
}
