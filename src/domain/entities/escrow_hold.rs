//! # Escrow Hold
//!
//! A record of seller-side asset quantity locked for a trade.
//!
//! Holds are append-only audit records: released and reverted holds stay
//! in the ledger with their final state rather than being deleted, so the
//! full history of escrow movements remains queryable.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Asset, Quantity, Timestamp, TradeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of an escrow hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldState {
    /// Quantity is locked pending trade settlement.
    Locked,
    /// Quantity was released to the buyer.
    Released,
    /// Quantity was returned to the seller after cancellation.
    Reverted,
}

impl HoldState {
    /// Returns true if the hold has reached a final state.
    #[inline]
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Released | Self::Reverted)
    }
}

impl fmt::Display for HoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Locked => "LOCKED",
            Self::Released => "RELEASED",
            Self::Reverted => "REVERTED",
        };
        write!(f, "{}", s)
    }
}

/// An escrow hold, keyed by trade ID (one hold per trade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowHold {
    trade_id: TradeId,
    asset: Asset,
    quantity: Quantity,
    state: HoldState,
    locked_at: Timestamp,
    settled_at: Option<Timestamp>,
}

impl EscrowHold {
    /// Locks `quantity` of `asset` for the given trade.
    #[must_use]
    pub fn lock(trade_id: TradeId, asset: Asset, quantity: Quantity, now: Timestamp) -> Self {
        Self {
            trade_id,
            asset,
            quantity,
            state: HoldState::Locked,
            locked_at: now,
            settled_at: None,
        }
    }

    /// Returns the trade the hold belongs to.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        self.trade_id
    }

    /// Returns the held asset.
    #[inline]
    #[must_use]
    pub fn asset(&self) -> Asset {
        self.asset
    }

    /// Returns the held quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the hold state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Returns when the hold was locked.
    #[inline]
    #[must_use]
    pub fn locked_at(&self) -> Timestamp {
        self.locked_at
    }

    /// Returns when the hold was settled, if it has been.
    #[inline]
    #[must_use]
    pub fn settled_at(&self) -> Option<Timestamp> {
        self.settled_at
    }

    /// Releases the held quantity to the buyer.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHoldState`] unless the hold is `Locked`.
    pub fn release(&mut self, now: Timestamp) -> DomainResult<()> {
        self.settle(HoldState::Released, now)
    }

    /// Returns the held quantity to the seller.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHoldState`] unless the hold is `Locked`.
    pub fn revert(&mut self, now: Timestamp) -> DomainResult<()> {
        self.settle(HoldState::Reverted, now)
    }

    fn settle(&mut self, target: HoldState, now: Timestamp) -> DomainResult<()> {
        if self.state != HoldState::Locked {
            return Err(DomainError::InvalidHoldState(format!(
                "hold for trade {} is {}, expected LOCKED",
                self.trade_id, self.state
            )));
        }
        self.state = target;
        self.settled_at = Some(now);
        Ok(())
    }
}

impl fmt::Display for EscrowHold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EscrowHold({} {} for {} [{}])",
            self.quantity, self.asset, self.trade_id, self.state
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_hold() -> EscrowHold {
        EscrowHold::lock(
            TradeId::new_v4(),
            Asset::Btc,
            "0.5".parse().unwrap(),
            Timestamp::from_millis(1_000),
        )
    }

    #[test]
    fn lock_creates_locked_hold() {
        let hold = test_hold();
        assert_eq!(hold.state(), HoldState::Locked);
        assert!(!hold.state().is_settled());
        assert!(hold.settled_at().is_none());
    }

    #[test]
    fn release_settles_the_hold() {
        let mut hold = test_hold();
        hold.release(Timestamp::from_millis(2_000)).unwrap();
        assert_eq!(hold.state(), HoldState::Released);
        assert_eq!(hold.settled_at(), Some(Timestamp::from_millis(2_000)));
    }

    #[test]
    fn revert_settles_the_hold() {
        let mut hold = test_hold();
        hold.revert(Timestamp::from_millis(2_000)).unwrap();
        assert_eq!(hold.state(), HoldState::Reverted);
    }

    #[test]
    fn release_after_release_fails() {
        let mut hold = test_hold();
        hold.release(Timestamp::from_millis(2_000)).unwrap();
        let result = hold.release(Timestamp::from_millis(3_000));
        assert!(matches!(result, Err(DomainError::InvalidHoldState(_))));
        assert_eq!(hold.settled_at(), Some(Timestamp::from_millis(2_000)));
    }

    #[test]
    fn revert_after_release_fails() {
        let mut hold = test_hold();
        hold.release(Timestamp::from_millis(2_000)).unwrap();
        let result = hold.revert(Timestamp::from_millis(3_000));
        assert!(matches!(result, Err(DomainError::InvalidHoldState(_))));
        assert_eq!(hold.state(), HoldState::Released);
    }

    #[test]
    fn hold_serde_roundtrip() {
        let hold = test_hold();
        let json = serde_json::to_string(&hold).unwrap();
        assert!(json.contains("\"LOCKED\""));
        let back: EscrowHold = serde_json::from_str(&json).unwrap();
        assert_eq!(hold, back);
    }
}
