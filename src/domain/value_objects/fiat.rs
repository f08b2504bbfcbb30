//! # Fiat Amount Value Object
//!
//! Non-negative fiat currency amount with checked arithmetic and
//! minor-unit rounding.
//!
//! A [`FiatAmount`] carries as much precision as the computation that
//! produced it; [`FiatAmount::round_minor_units`] snaps it to the fiat
//! currency's minor-unit scale using round-half-up, which is how tax
//! withholding and platform fees are finalized.
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::value_objects::fiat::FiatAmount;
//! use rust_decimal::Decimal;
//!
//! let gross: FiatAmount = "5000".parse().unwrap();
//! let tax = gross.safe_mul(Decimal::new(1, 2)).unwrap(); // 1%
//! assert_eq!(tax.round_minor_units(2).get(), Decimal::new(5000, 2)); // 50.00
//! ```

use super::arithmetic::{round_half_up, ArithmeticError, ArithmeticResult, CheckedArithmetic};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated fiat amount.
///
/// # Invariants
///
/// - Amount is always >= 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FiatAmount(Decimal);

impl FiatAmount {
    /// Zero amount constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new amount from an f64 value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is negative.
    #[must_use = "this returns a Result that should be handled"]
    pub fn new(value: f64) -> ArithmeticResult<Self> {
        let decimal =
            Decimal::try_from(value).map_err(|_| ArithmeticError::InvalidValue("invalid float"))?;
        Self::from_decimal(decimal)
    }

    /// Creates a new amount from a Decimal value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is negative.
    #[must_use = "this returns a Result that should be handled"]
    pub fn from_decimal(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() {
            return Err(ArithmeticError::InvalidValue("amount cannot be negative"));
        }
        Ok(Self(value))
    }

    /// Returns the inner Decimal value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Safely adds another amount.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        Ok(Self(self.0.safe_add(rhs.0)?))
    }

    /// Safely subtracts another amount.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would be negative.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        let result = self.0.safe_sub(rhs.0)?;
        if result.is_sign_negative() {
            return Err(ArithmeticError::Underflow);
        }
        Ok(Self(result))
    }

    /// Safely multiplies by a Decimal factor (e.g. a rate).
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow and
    /// `ArithmeticError::InvalidValue` if the result would be negative.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_mul(self, factor: Decimal) -> ArithmeticResult<Self> {
        let result = self.0.safe_mul(factor)?;
        if result.is_sign_negative() {
            return Err(ArithmeticError::InvalidValue(
                "multiplication result cannot be negative",
            ));
        }
        Ok(Self(result))
    }

    /// Safely divides by a Decimal divisor.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_div(self, divisor: Decimal) -> ArithmeticResult<Decimal> {
        self.0.safe_div(divisor)
    }

    /// Rounds to `scale` minor-unit digits using round-half-up.
    #[inline]
    #[must_use]
    pub fn round_minor_units(self, scale: u32) -> Self {
        Self(round_half_up(self.0, scale))
    }
}

impl fmt::Display for FiatAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for FiatAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FiatAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl TryFrom<Decimal> for FiatAmount {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<FiatAmount> for Decimal {
    fn from(amount: FiatAmount) -> Self {
        amount.0
    }
}

impl FromStr for FiatAmount {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s).map_err(|_| ArithmeticError::InvalidValue("invalid decimal"))?;
        Self::from_decimal(decimal)
    }
}

impl Default for FiatAmount {
    fn default() -> Self {
        Self::ZERO
    }
}
