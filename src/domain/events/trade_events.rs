//! # Trade Lifecycle Events
//!
//! Events emitted as a trade moves through its lifecycle, for audit
//! trail and downstream consumers.

use crate::domain::value_objects::{
    AdId, Asset, CancelReason, FiatAmount, Price, Quantity, Timestamp, TradeId, UserId, UtrNumber,
};
use serde::{Deserialize, Serialize};

/// Emitted when a trade is opened and its escrow is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStarted {
    /// The new trade.
    pub trade_id: TradeId,
    /// The advertisement the trade was taken against.
    pub ad_id: AdId,
    /// The buying user.
    pub buyer_id: UserId,
    /// The selling user.
    pub seller_id: UserId,
    /// The traded asset.
    pub asset: Asset,
    /// Quantity locked in escrow.
    pub quantity: Quantity,
    /// Unit price snapshotted at creation.
    pub unit_price: Price,
    /// Gross fiat total.
    pub fiat_total: FiatAmount,
    /// Payment deadline.
    pub expires_at: Timestamp,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Emitted when the buyer submits their settlement reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSubmitted {
    /// The trade.
    pub trade_id: TradeId,
    /// The submitted settlement reference.
    pub utr: UtrNumber,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Emitted when a party escalates the trade to a dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeRaised {
    /// The trade.
    pub trade_id: TradeId,
    /// The user who raised the dispute.
    pub raised_by: UserId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Emitted when escrow is released to the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReleased {
    /// The trade.
    pub trade_id: TradeId,
    /// Quantity released from escrow.
    pub quantity: Quantity,
    /// The traded asset.
    pub asset: Asset,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Emitted when a trade is cancelled and its escrow reverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCancelled {
    /// The trade.
    pub trade_id: TradeId,
    /// Why the trade was cancelled.
    pub reason: CancelReason,
    /// Quantity returned to the advertisement.
    pub quantity: Quantity,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
