//! # Trade Aggregate
//!
//! A single P2P trade from creation to terminal state.
//!
//! All monetary fields are snapshotted at creation and immutable
//! afterwards: once a trade starts, later reference-price updates never
//! change what the buyer and seller settle at. Only `state`, `utr`,
//! `cancel_reason`, and `terminal_at` mutate.
//!
//! # State Machine
//!
//! ```text
//! PendingPayment → PaymentSubmitted → Released
//!       ↓                 ↓              ↑
//!   Cancelled          Disputed ─────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::entities::trade::{Trade, TradeSnapshot};
//! use p2p_trade::domain::value_objects::{
//!     AdId, Asset, TradeId, Timestamp, UserId,
//! };
//!
//! let trade = Trade::open(
//!     TradeId::new_v4(),
//!     TradeSnapshot {
//!         ad_id: AdId::new_v4(),
//!         buyer_id: UserId::new("buyer_1"),
//!         seller_id: UserId::new("seller_1"),
//!         asset: Asset::Usdt,
//!         quantity: "54.674".parse().unwrap(),
//!         unit_price: "91.45".parse().unwrap(),
//!         fiat_total: "5000".parse().unwrap(),
//!         tax_withheld: "50.00".parse().unwrap(),
//!         platform_fee: "10.00".parse().unwrap(),
//!     },
//!     Timestamp::from_millis(0),
//!     Timestamp::from_millis(900_000),
//! );
//!
//! assert!(trade.state().is_active());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AdId, Asset, CancelReason, FiatAmount, Price, Quantity, Timestamp, TradeId, TradeState,
    UserId, UtrNumber,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The immutable financial facts captured when a trade starts.
///
/// Grouping them keeps [`Trade::open`] below the argument-count noise
/// threshold and makes the snapshot boundary explicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSnapshot {
    /// The advertisement the trade was taken against.
    pub ad_id: AdId,
    /// The buying user.
    pub buyer_id: UserId,
    /// The selling user (the ad owner).
    pub seller_id: UserId,
    /// The traded asset.
    pub asset: Asset,
    /// Asset quantity held in escrow.
    pub quantity: Quantity,
    /// Unit price resolved at creation.
    pub unit_price: Price,
    /// Gross fiat amount the buyer pays.
    pub fiat_total: FiatAmount,
    /// Tax withheld at source, levied on the gross amount.
    pub tax_withheld: FiatAmount,
    /// Platform commission, levied on the gross amount.
    pub platform_fee: FiatAmount,
}

/// A P2P trade.
///
/// # Invariants
///
/// - Snapshot fields never change after creation
/// - State transitions follow [`TradeState::can_transition_to`]
/// - `terminal_at` is set exactly once, when a terminal state is entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    id: TradeId,
    #[serde(flatten)]
    snapshot: TradeSnapshot,
    state: TradeState,
    utr: Option<UtrNumber>,
    cancel_reason: Option<CancelReason>,
    created_at: Timestamp,
    escrow_locked_at: Timestamp,
    expires_at: Timestamp,
    terminal_at: Option<Timestamp>,
    version: u64,
}

impl Trade {
    /// Opens a trade in `PendingPayment` with its escrow already locked.
    ///
    /// The caller (the trade lifecycle service) is responsible for having
    /// reserved ad inventory and created the matching escrow hold as part
    /// of the same logical transaction.
    #[must_use]
    pub fn open(
        id: TradeId,
        snapshot: TradeSnapshot,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id,
            snapshot,
            state: TradeState::PendingPayment,
            utr: None,
            cancel_reason: None,
            created_at,
            escrow_locked_at: created_at,
            expires_at,
            terminal_at: None,
            version: 1,
        }
    }

    fn transition_to(&mut self, target: TradeState, now: Timestamp) -> DomainResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        if target.is_terminal() {
            self.terminal_at = Some(now);
        }
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    // ========== Accessors ==========

    /// Returns the trade ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the advertisement this trade was taken against.
    #[inline]
    #[must_use]
    pub fn ad_id(&self) -> AdId {
        self.snapshot.ad_id
    }

    /// Returns the buyer.
    #[inline]
    #[must_use]
    pub fn buyer_id(&self) -> &UserId {
        &self.snapshot.buyer_id
    }

    /// Returns the seller.
    #[inline]
    #[must_use]
    pub fn seller_id(&self) -> &UserId {
        &self.snapshot.seller_id
    }

    /// Returns the traded asset.
    #[inline]
    #[must_use]
    pub fn asset(&self) -> Asset {
        self.snapshot.asset
    }

    /// Returns the escrowed quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.snapshot.quantity
    }

    /// Returns the snapshotted unit price.
    #[inline]
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.snapshot.unit_price
    }

    /// Returns the gross fiat total.
    #[inline]
    #[must_use]
    pub fn fiat_total(&self) -> FiatAmount {
        self.snapshot.fiat_total
    }

    /// Returns the tax withheld at source.
    #[inline]
    #[must_use]
    pub fn tax_withheld(&self) -> FiatAmount {
        self.snapshot.tax_withheld
    }

    /// Returns the platform commission.
    #[inline]
    #[must_use]
    pub fn platform_fee(&self) -> FiatAmount {
        self.snapshot.platform_fee
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> TradeState {
        self.state
    }

    /// Returns the submitted settlement reference, if any.
    #[inline]
    #[must_use]
    pub fn utr(&self) -> Option<&UtrNumber> {
        self.utr.as_ref()
    }

    /// Returns why the trade was cancelled, if it was.
    #[inline]
    #[must_use]
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        self.cancel_reason
    }

    /// Returns when the trade was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the escrow hold was locked.
    #[inline]
    #[must_use]
    pub fn escrow_locked_at(&self) -> Timestamp {
        self.escrow_locked_at
    }

    /// Returns the payment deadline.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns when the trade reached a terminal state, if it has.
    #[inline]
    #[must_use]
    pub fn terminal_at(&self) -> Option<Timestamp> {
        self.terminal_at
    }

    /// Returns the version for optimistic concurrency checks.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if the payment window has elapsed at `now`.
    ///
    /// Only meaningful while the trade is in `PendingPayment`; the check
    /// is authoritative in [`submit_payment`](Self::submit_payment)
    /// regardless of whether the expiry sweep has run.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.state == TradeState::PendingPayment && now.is_after(self.expires_at)
    }

    // ========== State Transitions ==========

    /// Records the buyer's settlement reference.
    ///
    /// Transitions: PendingPayment → PaymentSubmitted
    ///
    /// # Errors
    ///
    /// - [`DomainError::TradeExpired`] if `now` is past the deadline
    /// - [`DomainError::InvalidTransition`] if not in `PendingPayment`
    ///   (including a second submission)
    pub fn submit_payment(&mut self, utr: UtrNumber, now: Timestamp) -> DomainResult<()> {
        if self.is_expired(now) {
            return Err(DomainError::TradeExpired(self.id.to_string()));
        }
        self.transition_to(TradeState::PaymentSubmitted, now)?;
        self.utr = Some(utr);
        Ok(())
    }

    /// Releases the trade to the buyer.
    ///
    /// Transitions: PaymentSubmitted → Released, or Disputed → Released.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] from any other state.
    pub fn release(&mut self, now: Timestamp) -> DomainResult<()> {
        self.transition_to(TradeState::Released, now)
    }

    /// Cancels the trade, recording the audit reason.
    ///
    /// Transitions: PendingPayment → Cancelled, or Disputed → Cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] from any other state.
    pub fn cancel(&mut self, reason: CancelReason, now: Timestamp) -> DomainResult<()> {
        self.transition_to(TradeState::Cancelled, now)?;
        self.cancel_reason = Some(reason);
        Ok(())
    }

    /// Raises a dispute.
    ///
    /// Transitions: PaymentSubmitted → Disputed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] from any other state.
    pub fn raise_dispute(&mut self, now: Timestamp) -> DomainResult<()> {
        self.transition_to(TradeState::Disputed, now)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade({} {} {} @ {} [{}])",
            self.id, self.snapshot.quantity, self.snapshot.asset, self.snapshot.unit_price,
            self.state
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_snapshot() -> TradeSnapshot {
        TradeSnapshot {
            ad_id: AdId::new_v4(),
            buyer_id: UserId::new("buyer_1"),
            seller_id: UserId::new("seller_1"),
            asset: Asset::Usdt,
            quantity: "54.674".parse().unwrap(),
            unit_price: "91.45".parse().unwrap(),
            fiat_total: "5000".parse().unwrap(),
            tax_withheld: "50.00".parse().unwrap(),
            platform_fee: "10.00".parse().unwrap(),
        }
    }

    fn test_trade() -> Trade {
        Trade::open(
            TradeId::new_v4(),
            test_snapshot(),
            Timestamp::from_millis(0),
            Timestamp::from_millis(900_000),
        )
    }

    fn test_utr() -> UtrNumber {
        "123456789012".parse().unwrap()
    }

    fn before_expiry() -> Timestamp {
        Timestamp::from_millis(60_000)
    }

    fn after_expiry() -> Timestamp {
        Timestamp::from_millis(900_001)
    }

    mod construction {
        use super::*;

        #[test]
        fn open_creates_pending_trade() {
            let trade = test_trade();
            assert_eq!(trade.state(), TradeState::PendingPayment);
            assert_eq!(trade.version(), 1);
            assert!(trade.utr().is_none());
            assert!(trade.cancel_reason().is_none());
            assert!(trade.terminal_at().is_none());
            assert_eq!(trade.escrow_locked_at(), trade.created_at());
        }
    }

    mod submit_payment {
        use super::*;

        #[test]
        fn before_deadline_succeeds() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            assert_eq!(trade.state(), TradeState::PaymentSubmitted);
            assert_eq!(trade.utr().unwrap().as_str(), "123456789012");
            assert_eq!(trade.version(), 2);
        }

        #[test]
        fn after_deadline_fails_with_expiry() {
            let mut trade = test_trade();
            let result = trade.submit_payment(test_utr(), after_expiry());
            assert!(matches!(result, Err(DomainError::TradeExpired(_))));
            // Trade untouched by the failed call
            assert_eq!(trade.state(), TradeState::PendingPayment);
            assert!(trade.utr().is_none());
        }

        #[test]
        fn exactly_at_deadline_succeeds() {
            let mut trade = test_trade();
            let result = trade.submit_payment(test_utr(), Timestamp::from_millis(900_000));
            assert!(result.is_ok());
        }

        #[test]
        fn second_submission_fails() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            let result = trade.submit_payment("999999999999".parse().unwrap(), before_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
            assert_eq!(trade.utr().unwrap().as_str(), "123456789012");
        }
    }

    mod release {
        use super::*;

        #[test]
        fn from_payment_submitted() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.release(before_expiry()).unwrap();
            assert_eq!(trade.state(), TradeState::Released);
            assert_eq!(trade.terminal_at(), Some(before_expiry()));
        }

        #[test]
        fn from_pending_fails() {
            let mut trade = test_trade();
            let result = trade.release(before_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        }

        #[test]
        fn double_release_fails_and_preserves_state() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.release(before_expiry()).unwrap();
            let version = trade.version();

            let result = trade.release(after_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
            assert_eq!(trade.state(), TradeState::Released);
            assert_eq!(trade.version(), version);
            assert_eq!(trade.terminal_at(), Some(before_expiry()));
        }
    }

    mod cancel {
        use super::*;

        #[test]
        fn from_pending_records_reason() {
            let mut trade = test_trade();
            trade
                .cancel(CancelReason::UserRequested, before_expiry())
                .unwrap();
            assert_eq!(trade.state(), TradeState::Cancelled);
            assert_eq!(trade.cancel_reason(), Some(CancelReason::UserRequested));
        }

        #[test]
        fn expiry_reason_is_recorded() {
            let mut trade = test_trade();
            trade.cancel(CancelReason::Expired, after_expiry()).unwrap();
            assert_eq!(trade.cancel_reason(), Some(CancelReason::Expired));
        }

        #[test]
        fn after_payment_submitted_fails() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            let result = trade.cancel(CancelReason::UserRequested, before_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        }

        #[test]
        fn double_cancel_fails() {
            let mut trade = test_trade();
            trade
                .cancel(CancelReason::UserRequested, before_expiry())
                .unwrap();
            let result = trade.cancel(CancelReason::Expired, after_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
            assert_eq!(trade.cancel_reason(), Some(CancelReason::UserRequested));
        }
    }

    mod dispute {
        use super::*;

        #[test]
        fn dispute_then_release() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.raise_dispute(before_expiry()).unwrap();
            assert_eq!(trade.state(), TradeState::Disputed);

            trade.release(before_expiry()).unwrap();
            assert_eq!(trade.state(), TradeState::Released);
        }

        #[test]
        fn dispute_then_cancel() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.raise_dispute(before_expiry()).unwrap();

            trade
                .cancel(CancelReason::DisputeResolved, before_expiry())
                .unwrap();
            assert_eq!(trade.state(), TradeState::Cancelled);
            assert_eq!(trade.cancel_reason(), Some(CancelReason::DisputeResolved));
        }

        #[test]
        fn dispute_from_pending_fails() {
            let mut trade = test_trade();
            let result = trade.raise_dispute(before_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        }

        #[test]
        fn double_dispute_fails() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.raise_dispute(before_expiry()).unwrap();
            let result = trade.raise_dispute(before_expiry());
            assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        }
    }

    mod expiry {
        use super::*;

        #[test]
        fn pending_past_deadline_is_expired() {
            let trade = test_trade();
            assert!(trade.is_expired(after_expiry()));
            assert!(!trade.is_expired(before_expiry()));
        }

        #[test]
        fn terminal_trade_is_never_expired() {
            let mut trade = test_trade();
            trade
                .cancel(CancelReason::UserRequested, before_expiry())
                .unwrap();
            assert!(!trade.is_expired(after_expiry()));
        }
    }

    mod snapshot_immutability {
        use super::*;

        #[test]
        fn snapshot_survives_full_lifecycle() {
            let mut trade = test_trade();
            let price = trade.unit_price();
            let quantity = trade.quantity();
            let tax = trade.tax_withheld();
            let fee = trade.platform_fee();

            trade.submit_payment(test_utr(), before_expiry()).unwrap();
            trade.raise_dispute(before_expiry()).unwrap();
            trade.release(before_expiry()).unwrap();

            assert_eq!(trade.unit_price(), price);
            assert_eq!(trade.quantity(), quantity);
            assert_eq!(trade.tax_withheld(), tax);
            assert_eq!(trade.platform_fee(), fee);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn trade_serde_roundtrip() {
            let mut trade = test_trade();
            trade.submit_payment(test_utr(), before_expiry()).unwrap();

            let json = serde_json::to_string(&trade).unwrap();
            let back: Trade = serde_json::from_str(&json).unwrap();

            assert_eq!(trade, back);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_format() {
            let display = test_trade().to_string();
            assert!(display.contains("Trade"));
            assert!(display.contains("PENDING_PAYMENT"));
            assert!(display.contains("USDT"));
        }
    }
}
