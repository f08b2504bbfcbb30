//! # Escrow Ledger
//!
//! Keeps the escrow holds backing open trades, one per trade.
//!
//! Settled holds stay in the ledger with their final state so the full
//! history of escrow movements remains auditable. Double settlement of a
//! hold fails loudly rather than being absorbed.

use crate::domain::entities::EscrowHold;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Asset, Clock, Quantity, TradeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory escrow hold ledger.
#[derive(Debug)]
pub struct EscrowLedger {
    holds: RwLock<HashMap<TradeId, EscrowHold>>,
    clock: Arc<dyn Clock>,
}

impl EscrowLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            holds: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Locks `quantity` of `asset` for a trade.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyLocked`] if a hold already exists for
    /// the trade, in any state.
    pub async fn lock(&self, trade_id: TradeId, asset: Asset, quantity: Quantity) -> DomainResult<()> {
        let mut holds = self.holds.write().await;
        if holds.contains_key(&trade_id) {
            return Err(DomainError::AlreadyLocked(trade_id.to_string()));
        }
        let hold = EscrowHold::lock(trade_id, asset, quantity, self.clock.now());
        tracing::debug!(trade_id = %trade_id, hold = %hold, "escrow locked");
        holds.insert(trade_id, hold);
        Ok(())
    }

    /// Releases a trade's hold to the buyer.
    ///
    /// # Errors
    ///
    /// - [`DomainError::HoldNotFound`] if no hold exists
    /// - [`DomainError::InvalidHoldState`] if the hold is already settled
    pub async fn release(&self, trade_id: TradeId) -> DomainResult<()> {
        let now = self.clock.now();
        let mut holds = self.holds.write().await;
        let hold = holds
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::HoldNotFound(trade_id.to_string()))?;
        hold.release(now)?;
        tracing::debug!(trade_id = %trade_id, "escrow released");
        Ok(())
    }

    /// Reverts a trade's hold to the seller.
    ///
    /// # Errors
    ///
    /// - [`DomainError::HoldNotFound`] if no hold exists
    /// - [`DomainError::InvalidHoldState`] if the hold is already settled
    pub async fn revert(&self, trade_id: TradeId) -> DomainResult<()> {
        let now = self.clock.now();
        let mut holds = self.holds.write().await;
        let hold = holds
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::HoldNotFound(trade_id.to_string()))?;
        hold.revert(now)?;
        tracing::debug!(trade_id = %trade_id, "escrow reverted");
        Ok(())
    }

    /// Returns a trade's hold for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::HoldNotFound`] if no hold exists.
    pub async fn get(&self, trade_id: TradeId) -> DomainResult<EscrowHold> {
        self.holds
            .read()
            .await
            .get(&trade_id)
            .cloned()
            .ok_or_else(|| DomainError::HoldNotFound(trade_id.to_string()))
    }
}
