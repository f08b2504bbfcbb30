//! # Checked Arithmetic
//!
//! Safe decimal arithmetic primitives shared by the numeric value objects.
//!
//! This module provides the [`CheckedArithmetic`] trait together with the
//! [`ArithmeticError`] type. Every monetary computation in the crate goes
//! through these operations; raw operators on [`Decimal`] are not used in
//! domain code.
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let a = Decimal::new(150, 1); // 15.0
//! let b = Decimal::new(25, 1);  // 2.5
//!
//! assert_eq!(a.safe_add(b).unwrap(), Decimal::new(175, 1));
//! assert!(a.safe_div(Decimal::ZERO).is_err());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors produced by checked arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// The result exceeded the representable range.
    #[error("arithmetic overflow")]
    Overflow,

    /// The result fell below the representable (or permitted) range.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// The operand or result violated a domain constraint.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result type for checked arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic operations over a numeric type.
///
/// Implemented for [`Decimal`]; the numeric value objects delegate to this
/// trait so that overflow, underflow, and division by zero always surface
/// as typed errors instead of panics or silent wrap-around.
pub trait CheckedArithmetic: Sized {
    /// Adds, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the result is not representable.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Subtracts, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Underflow`] if the result is not representable.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Multiplies, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the result is not representable.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Divides, failing on division by zero.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::DivisionByZero`] if `rhs` is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds a decimal to `scale` fractional digits using round-half-up.
///
/// Half-up here means midpoints round away from zero, which for the
/// non-negative monetary values in this crate is the conventional
/// "0.005 becomes 0.01" behavior used for fiat minor units.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::arithmetic::round_half_up;
/// use rust_decimal::Decimal;
///
/// let v = Decimal::new(12345, 3); // 12.345
/// assert_eq!(round_half_up(v, 2), Decimal::new(1235, 2)); // 12.35
/// ```
#[must_use]
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}
