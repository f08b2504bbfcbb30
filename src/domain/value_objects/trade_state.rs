//! # Trade State
//!
//! Trade lifecycle state machine.
//!
//! This module provides the [`TradeState`] enum representing the lifecycle
//! of a P2P trade with enforced state transitions.
//!
//! # State Machine
//!
//! ```text
//! PendingPayment → PaymentSubmitted → Released
//!       ↓                 ↓              ↑
//!   Cancelled          Disputed ─────────┤
//!       ↑                 │              │
//!       └─────────────────┘        (arbiter only)
//! ```
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::value_objects::trade_state::TradeState;
//!
//! let state = TradeState::PendingPayment;
//! assert!(state.can_transition_to(TradeState::PaymentSubmitted));
//! assert!(!state.can_transition_to(TradeState::Released));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade lifecycle state.
///
/// State transitions are enforced via [`can_transition_to`](TradeState::can_transition_to).
///
/// # Terminal States
///
/// - [`Released`](TradeState::Released) - Escrow released to the buyer
/// - [`Cancelled`](TradeState::Cancelled) - Escrow reverted to the seller
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::trade_state::TradeState;
///
/// assert!(!TradeState::Disputed.is_terminal());
/// assert!(TradeState::Released.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TradeState {
    /// Trade created, escrow locked, buyer has not yet paid.
    #[default]
    PendingPayment = 0,

    /// Buyer submitted a settlement reference; awaiting seller confirmation.
    PaymentSubmitted = 1,

    /// Either party raised a dispute; only an arbiter may resolve.
    Disputed = 2,

    /// Escrow released to the buyer (terminal).
    Released = 3,

    /// Trade cancelled, escrow reverted to the seller (terminal).
    Cancelled = 4,
}

impl TradeState {
    /// Returns true if this is a terminal state.
    ///
    /// Terminal states cannot transition to any other state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the trade state machine rules:
    /// - PendingPayment → PaymentSubmitted, Cancelled
    /// - PaymentSubmitted → Released, Disputed
    /// - Disputed → Released, Cancelled
    /// - Terminal states → (none)
    ///
    /// # Arguments
    ///
    /// * `target` - The target state to transition to
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::PendingPayment, Self::PaymentSubmitted)
                | (Self::PendingPayment, Self::Cancelled)
                | (Self::PaymentSubmitted, Self::Released)
                | (Self::PaymentSubmitted, Self::Disputed)
                | (Self::Disputed, Self::Released)
                | (Self::Disputed, Self::Cancelled)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::PendingPayment => vec![Self::PaymentSubmitted, Self::Cancelled],
            Self::PaymentSubmitted => vec![Self::Released, Self::Disputed],
            Self::Disputed => vec![Self::Released, Self::Cancelled],
            Self::Released | Self::Cancelled => vec![],
        }
    }

    /// Returns true if this is an active (non-terminal) state.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the numeric value of this state.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::PaymentSubmitted => "PAYMENT_SUBMITTED",
            Self::Disputed => "DISPUTED",
            Self::Released => "RELEASED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

impl TryFrom<u8> for TradeState {
    type Error = InvalidTradeStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PendingPayment),
            1 => Ok(Self::PaymentSubmitted),
            2 => Ok(Self::Disputed),
            3 => Ok(Self::Released),
            4 => Ok(Self::Cancelled),
            _ => Err(InvalidTradeStateError(value)),
        }
    }
}

/// Error returned when converting an invalid u8 to TradeState.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTradeStateError(pub u8);

impl fmt::Display for InvalidTradeStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trade state value: {}", self.0)
    }
}

impl std::error::Error for InvalidTradeStateError {}

/// Why a trade ended in [`TradeState::Cancelled`].
///
/// Expiry-driven cancellation is system-initiated and must be
/// distinguishable from user cancellation in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    /// Buyer or seller cancelled before payment was submitted.
    UserRequested,
    /// The payment window elapsed without a settlement reference.
    Expired,
    /// An arbiter resolved a dispute in the seller's favor.
    DisputeResolved,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UserRequested => "USER_REQUESTED",
            Self::Expired => "EXPIRED",
            Self::DisputeResolved => "DISPUTE_RESOLVED",
        };
        write!(f, "{}", s)
    }
}
