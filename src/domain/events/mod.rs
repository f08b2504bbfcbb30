//! # Domain Events
//!
//! Events emitted during trade lifecycle operations for audit trail and
//! downstream consumers.
//!
//! ## Trade Events
//!
//! - `TradeStarted`: trade opened, escrow locked
//! - `PaymentSubmitted`: buyer submitted their settlement reference
//! - `DisputeRaised`: trade escalated to arbitration
//! - `TradeReleased`: escrow released to the buyer
//! - `TradeCancelled`: trade cancelled, escrow reverted

pub mod trade_events;

pub use trade_events::{
    DisputeRaised, PaymentSubmitted, TradeCancelled, TradeReleased, TradeStarted,
};

use async_trait::async_trait;
use std::fmt;

/// Publisher for trade lifecycle events.
///
/// Implementations must not fail the originating operation: publishing
/// happens after the state change has been committed, so errors are
/// surfaced as strings for the caller to log and move on.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes a trade started event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish_trade_started(&self, event: TradeStarted) -> Result<(), String>;

    /// Publishes a payment submitted event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish_payment_submitted(&self, event: PaymentSubmitted) -> Result<(), String>;

    /// Publishes a dispute raised event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish_dispute_raised(&self, event: DisputeRaised) -> Result<(), String>;

    /// Publishes a trade released event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish_trade_released(&self, event: TradeReleased) -> Result<(), String>;

    /// Publishes a trade cancelled event.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    async fn publish_trade_cancelled(&self, event: TradeCancelled) -> Result<(), String>;
}

/// Event publisher that emits events as structured log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish_trade_started(&self, event: TradeStarted) -> Result<(), String> {
        tracing::info!(
            trade_id = %event.trade_id,
            ad_id = %event.ad_id,
            asset = %event.asset,
            quantity = %event.quantity,
            fiat_total = %event.fiat_total,
            "trade started"
        );
        Ok(())
    }

    async fn publish_payment_submitted(&self, event: PaymentSubmitted) -> Result<(), String> {
        tracing::info!(
            trade_id = %event.trade_id,
            utr = %event.utr,
            "payment submitted"
        );
        Ok(())
    }

    async fn publish_dispute_raised(&self, event: DisputeRaised) -> Result<(), String> {
        tracing::warn!(
            trade_id = %event.trade_id,
            raised_by = %event.raised_by,
            "dispute raised"
        );
        Ok(())
    }

    async fn publish_trade_released(&self, event: TradeReleased) -> Result<(), String> {
        tracing::info!(
            trade_id = %event.trade_id,
            quantity = %event.quantity,
            asset = %event.asset,
            "trade released"
        );
        Ok(())
    }

    async fn publish_trade_cancelled(&self, event: TradeCancelled) -> Result<(), String> {
        tracing::info!(
            trade_id = %event.trade_id,
            reason = ?event.reason,
            quantity = %event.quantity,
            "trade cancelled"
        );
        Ok(())
    }
}
