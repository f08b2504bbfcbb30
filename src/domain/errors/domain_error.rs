//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: State errors
//! - **3000-3999**: Escrow errors
//! - **4000-4999**: Arithmetic errors
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidReference("too short".to_string());
//! assert_eq!(error.code(), 1005);
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::trade_state::TradeState;
use crate::domain::value_objects::utr::UtrError;
use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// Provides typed errors for domain operations with consistent
/// error codes for logging and audit records.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | State errors |
/// | 3000-3999 | Escrow errors |
/// | 4000-4999 | Arithmetic errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Invalid price value.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Invalid quantity value.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Advertisement limits are malformed (min above max, or out of bounds).
    #[error("invalid limits: {0}")]
    InvalidLimits(String),

    /// Malformed settlement reference.
    #[error("invalid settlement reference: {0}")]
    InvalidReference(String),

    /// Generic validation error (malformed ad spec, missing payment methods).
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: TradeState,
        /// The attempted target state.
        to: TradeState,
    },

    /// Advertisement not found or closed.
    #[error("advertisement not found: {0}")]
    AdNotFound(String),

    /// Advertisement exists but is closed to new trades.
    #[error("advertisement closed: {0}")]
    AdClosed(String),

    /// Trade not found.
    #[error("trade not found: {0}")]
    TradeNotFound(String),

    /// No price quote exists for the asset.
    #[error("no price quote for asset: {0}")]
    AssetNotFound(String),

    /// Requested fiat amount is outside the ad's min/max limits.
    #[error("amount out of limits: {0}")]
    OutOfLimits(String),

    /// Advertisement quantity exhausted at reservation time.
    #[error("insufficient liquidity: {0}")]
    InsufficientLiquidity(String),

    /// The trade's payment window has elapsed.
    #[error("trade expired: {0}")]
    TradeExpired(String),

    /// The actor is not permitted to perform this transition.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    // ========================================================================
    // Escrow Errors (3000-3999)
    // ========================================================================
    /// A hold already exists for the trade.
    #[error("escrow already locked for trade: {0}")]
    AlreadyLocked(String),

    /// No hold exists for the trade.
    #[error("escrow hold not found for trade: {0}")]
    HoldNotFound(String),

    /// The hold is not in the state required by the operation.
    #[error("invalid escrow state: {0}")]
    InvalidHoldState(String),

    // ========================================================================
    // Arithmetic Errors (4000-4999)
    // ========================================================================
    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid arithmetic value.
    #[error("invalid arithmetic value: {0}")]
    InvalidArithmeticValue(String),
}

impl DomainError {
    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use p2p_trade::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidPrice("test".to_string()).code(), 1001);
    /// assert_eq!(DomainError::Overflow.code(), 4001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidPrice(_) => 1001,
            Self::InvalidQuantity(_) => 1002,
            Self::InvalidLimits(_) => 1003,
            Self::InvalidReference(_) => 1005,
            Self::ValidationError(_) => 1099,

            // State errors (2000-2999)
            Self::InvalidTransition { .. } => 2001,
            Self::AdNotFound(_) => 2002,
            Self::AdClosed(_) => 2003,
            Self::TradeNotFound(_) => 2004,
            Self::AssetNotFound(_) => 2005,
            Self::OutOfLimits(_) => 2006,
            Self::InsufficientLiquidity(_) => 2007,
            Self::TradeExpired(_) => 2008,
            Self::NotAuthorized(_) => 2009,

            // Escrow errors (3000-3999)
            Self::AlreadyLocked(_) => 3001,
            Self::HoldNotFound(_) => 3002,
            Self::InvalidHoldState(_) => 3003,

            // Arithmetic errors (4000-4999)
            Self::Overflow => 4001,
            Self::Underflow => 4002,
            Self::DivisionByZero => 4003,
            Self::InvalidArithmeticValue(_) => 4004,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            3000..=3999 => "escrow",
            4000..=4999 => "arithmetic",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an escrow error.
    #[inline]
    #[must_use]
    pub const fn is_escrow_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}

impl From<ArithmeticError> for DomainError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow => Self::Overflow,
            ArithmeticError::Underflow => Self::Underflow,
            ArithmeticError::DivisionByZero => Self::DivisionByZero,
            ArithmeticError::InvalidValue(msg) => Self::InvalidArithmeticValue(msg.to_string()),
        }
    }
}

impl From<UtrError> for DomainError {
    fn from(err: UtrError) -> Self {
        Self::InvalidReference(err.to_string())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
