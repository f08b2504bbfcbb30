//! # Trade Lifecycle
//!
//! Orchestrates the trade state machine over the catalog, price book,
//! and escrow ledger.
//!
//! Trade creation is all-or-nothing: validation, price resolution, fee
//! computation, inventory reservation, and escrow locking either all
//! take effect or none do. A failure after the reserve step releases the
//! reservation before the error propagates.
//!
//! Money math note: tax and commission are both computed against the
//! gross fiat amount, not sequentially against a running net. Each is
//! rounded half-up to the fiat minor-unit scale on its own.

use crate::application::services::ad_catalog::AdCatalog;
use crate::application::services::advisory::AdvisoryService;
use crate::application::services::escrow_ledger::EscrowLedger;
use crate::domain::entities::{Advertisement, Trade, TradeSnapshot};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{
    DisputeRaised, EventPublisher, PaymentSubmitted, TradeCancelled, TradeReleased, TradeStarted,
};
use crate::domain::value_objects::{
    Actor, AdId, CancelReason, Clock, FiatAmount, IdGenerator, Price, Quantity, TradeId,
    TradeState, UserId, UtrNumber,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Monetary policy applied at trade creation.
#[derive(Debug, Clone)]
pub struct TradePolicy {
    /// Tax withheld at source, as a fraction of the gross fiat amount.
    pub tds_rate: Decimal,
    /// Platform commission, as a fraction of the gross fiat amount.
    pub commission_rate: Decimal,
    /// Payment window length in minutes.
    pub expiry_minutes: i64,
    /// Minor-unit digits of the fiat currency.
    pub fiat_scale: u32,
}

impl Default for TradePolicy {
    fn default() -> Self {
        Self {
            tds_rate: Decimal::new(1, 2),         // 1%
            commission_rate: Decimal::new(2, 3),  // 0.2%
            expiry_minutes: 15,
            fiat_scale: 2,
        }
    }
}

/// The trade lifecycle service.
#[derive(Debug)]
pub struct TradeLifecycle {
    trades: RwLock<HashMap<TradeId, Trade>>,
    catalog: Arc<AdCatalog>,
    escrow: Arc<EscrowLedger>,
    publisher: Arc<dyn EventPublisher>,
    advisory: Arc<dyn AdvisoryService>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    policy: TradePolicy,
}

impl TradeLifecycle {
    /// Creates the lifecycle service over its collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<AdCatalog>,
        escrow: Arc<EscrowLedger>,
        publisher: Arc<dyn EventPublisher>,
        advisory: Arc<dyn AdvisoryService>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        policy: TradePolicy,
    ) -> Self {
        Self {
            trades: RwLock::new(HashMap::new()),
            catalog,
            escrow,
            publisher,
            advisory,
            clock,
            ids,
            policy,
        }
    }

    /// Returns a snapshot of a trade.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TradeNotFound`] if no such trade exists.
    pub async fn get_trade(&self, trade_id: TradeId) -> DomainResult<Trade> {
        self.trades
            .read()
            .await
            .get(&trade_id)
            .cloned()
            .ok_or_else(|| DomainError::TradeNotFound(trade_id.to_string()))
    }

    /// Opens a trade against an advertisement.
    ///
    /// The creation transaction: load and validate the ad, resolve the
    /// effective price, derive quantity/tax/fee from the gross fiat
    /// amount, reserve ad inventory, lock escrow, and record the trade
    /// in `PendingPayment` with a payment deadline. A failure after the
    /// reserve step releases the reservation.
    ///
    /// # Errors
    ///
    /// - [`DomainError::AdNotFound`] / [`DomainError::AdClosed`]
    /// - [`DomainError::ValidationError`] if the buyer owns the ad
    /// - [`DomainError::OutOfLimits`] if `requested_fiat` is outside the
    ///   ad's limits
    /// - [`DomainError::AssetNotFound`] for a floating ad with no quote
    /// - [`DomainError::InsufficientLiquidity`] on inventory shortfall
    /// - Escrow and arithmetic errors from the remaining steps
    pub async fn start_trade(
        &self,
        ad_id: AdId,
        buyer_id: UserId,
        requested_fiat: FiatAmount,
    ) -> DomainResult<Trade> {
        let ad = self.catalog.get_ad(ad_id).await?;
        if ad.is_closed() {
            return Err(DomainError::AdClosed(ad_id.to_string()));
        }
        if &buyer_id == ad.owner_id() {
            return Err(DomainError::ValidationError(
                "cannot trade against own advertisement".to_string(),
            ));
        }
        if !ad.within_limits(requested_fiat) {
            return Err(DomainError::OutOfLimits(format!(
                "{} not in [{}, {}]",
                requested_fiat,
                ad.min_fiat_limit(),
                ad.max_fiat_limit()
            )));
        }

        let unit_price = self.catalog.resolve_price(&ad).await?;
        let quantity = Quantity::from_decimal(requested_fiat.safe_div(unit_price.get())?)?;
        let tax_withheld = requested_fiat
            .safe_mul(self.policy.tds_rate)?
            .round_minor_units(self.policy.fiat_scale);
        let platform_fee = requested_fiat
            .safe_mul(self.policy.commission_rate)?
            .round_minor_units(self.policy.fiat_scale);

        self.catalog.reserve_quantity(ad_id, quantity).await?;

        // Reservation is held from here on; compensate on any failure.
        let trade = match self
            .lock_and_record(ad_id, &ad, buyer_id, requested_fiat, unit_price, quantity, tax_withheld, platform_fee)
            .await
        {
            Ok(trade) => trade,
            Err(err) => {
                if let Err(release_err) = self.catalog.release_quantity(ad_id, quantity).await {
                    tracing::error!(
                        ad_id = %ad_id,
                        quantity = %quantity,
                        error = %release_err,
                        "failed to release reservation after aborted trade creation"
                    );
                }
                return Err(err);
            }
        };

        let event = TradeStarted {
            trade_id: trade.id(),
            ad_id,
            buyer_id: trade.buyer_id().clone(),
            seller_id: trade.seller_id().clone(),
            asset: trade.asset(),
            quantity: trade.quantity(),
            unit_price: trade.unit_price(),
            fiat_total: trade.fiat_total(),
            expires_at: trade.expires_at(),
            occurred_at: trade.created_at(),
        };
        if let Err(err) = self.publisher.publish_trade_started(event).await {
            tracing::warn!(trade_id = %trade.id(), error = %err, "event publish failed");
        }

        match self.advisory.advise(&trade).await {
            Ok(Some(note)) => tracing::info!(trade_id = %trade.id(), note = %note, "advisory note"),
            Ok(None) => {}
            Err(err) => tracing::warn!(trade_id = %trade.id(), error = %err, "advisory failed"),
        }

        Ok(trade)
    }

    #[allow(clippy::too_many_arguments)]
    async fn lock_and_record(
        &self,
        ad_id: AdId,
        ad: &Advertisement,
        buyer_id: UserId,
        fiat_total: FiatAmount,
        unit_price: Price,
        quantity: Quantity,
        tax_withheld: FiatAmount,
        platform_fee: FiatAmount,
    ) -> DomainResult<Trade> {
        let trade_id = self.ids.next_trade_id();
        self.escrow.lock(trade_id, ad.asset(), quantity).await?;

        let now = self.clock.now();
        let trade = Trade::open(
            trade_id,
            TradeSnapshot {
                ad_id,
                buyer_id,
                seller_id: ad.owner_id().clone(),
                asset: ad.asset(),
                quantity,
                unit_price,
                fiat_total,
                tax_withheld,
                platform_fee,
            },
            now,
            now.plus_minutes(self.policy.expiry_minutes),
        );
        self.trades.write().await.insert(trade_id, trade.clone());
        Ok(trade)
    }

    /// Records the buyer's settlement reference.
    ///
    /// The deadline check here is authoritative: a late submission fails
    /// with [`DomainError::TradeExpired`] whether or not the expiry sweep
    /// has gotten to the trade yet.
    ///
    /// # Errors
    ///
    /// - [`DomainError::TradeNotFound`]
    /// - [`DomainError::InvalidReference`] if `utr` is not exactly 12
    ///   ASCII digits
    /// - [`DomainError::TradeExpired`] past the deadline
    /// - [`DomainError::InvalidTransition`] from any state but
    ///   `PendingPayment`
    pub async fn submit_payment(&self, trade_id: TradeId, utr: &str) -> DomainResult<Trade> {
        let utr: UtrNumber = utr.parse()?;
        let now = self.clock.now();

        let mut trades = self.trades.write().await;
        let trade = trades
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::TradeNotFound(trade_id.to_string()))?;
        trade.submit_payment(utr.clone(), now)?;
        let snapshot = trade.clone();
        drop(trades);

        if let Err(err) = self
            .publisher
            .publish_payment_submitted(PaymentSubmitted {
                trade_id,
                utr,
                occurred_at: now,
            })
            .await
        {
            tracing::warn!(trade_id = %trade_id, error = %err, "event publish failed");
        }
        Ok(snapshot)
    }

    /// Releases escrow to the buyer and terminates the trade.
    ///
    /// From `PaymentSubmitted` the seller or an arbiter may release; from
    /// `Disputed` only an arbiter may.
    ///
    /// # Errors
    ///
    /// - [`DomainError::TradeNotFound`]
    /// - [`DomainError::NotAuthorized`] for the wrong actor
    /// - [`DomainError::InvalidTransition`] from any other state
    pub async fn release(&self, trade_id: TradeId, actor: &Actor) -> DomainResult<Trade> {
        let now = self.clock.now();
        let mut trades = self.trades.write().await;
        let trade = trades
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::TradeNotFound(trade_id.to_string()))?;

        match trade.state() {
            TradeState::PaymentSubmitted => {
                if !actor.is_arbiter() && &actor.user_id != trade.seller_id() {
                    return Err(DomainError::NotAuthorized(format!(
                        "{} may not release trade {}",
                        actor, trade_id
                    )));
                }
            }
            TradeState::Disputed => {
                if !actor.is_arbiter() {
                    return Err(DomainError::NotAuthorized(format!(
                        "only an arbiter may release disputed trade {}",
                        trade_id
                    )));
                }
            }
            // Any other state fails the transition check below.
            _ => {}
        }

        trade.release(now)?;
        self.escrow.release(trade_id).await?;
        let snapshot = trade.clone();
        drop(trades);

        if let Err(err) = self
            .publisher
            .publish_trade_released(TradeReleased {
                trade_id,
                quantity: snapshot.quantity(),
                asset: snapshot.asset(),
                occurred_at: now,
            })
            .await
        {
            tracing::warn!(trade_id = %trade_id, error = %err, "event publish failed");
        }
        Ok(snapshot)
    }

    /// Cancels the trade, reverting escrow and restoring ad inventory.
    ///
    /// From `PendingPayment` the buyer, the seller, or the system may
    /// cancel; from `Disputed` only an arbiter may.
    ///
    /// # Errors
    ///
    /// - [`DomainError::TradeNotFound`]
    /// - [`DomainError::NotAuthorized`] for the wrong actor
    /// - [`DomainError::InvalidTransition`] from any other state
    pub async fn cancel(
        &self,
        trade_id: TradeId,
        actor: &Actor,
        reason: CancelReason,
    ) -> DomainResult<Trade> {
        let mut trades = self.trades.write().await;
        let trade = trades
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::TradeNotFound(trade_id.to_string()))?;

        match trade.state() {
            TradeState::PendingPayment => {
                let is_party = &actor.user_id == trade.buyer_id()
                    || &actor.user_id == trade.seller_id();
                if !is_party && !actor.is_system() {
                    return Err(DomainError::NotAuthorized(format!(
                        "{} may not cancel trade {}",
                        actor, trade_id
                    )));
                }
            }
            TradeState::Disputed => {
                if !actor.is_arbiter() {
                    return Err(DomainError::NotAuthorized(format!(
                        "only an arbiter may cancel disputed trade {}",
                        trade_id
                    )));
                }
            }
            // Any other state fails the transition check below.
            _ => {}
        }

        let snapshot = self.finalize_cancel(trade, reason).await?;
        drop(trades);

        match reason {
            CancelReason::Expired => {
                tracing::info!(trade_id = %trade_id, "trade cancelled on expiry");
            }
            _ => tracing::info!(trade_id = %trade_id, actor = %actor, reason = ?reason, "trade cancelled"),
        }
        Ok(snapshot)
    }

    /// Escalates a trade to arbitration.
    ///
    /// Only a party to the trade may dispute, and only from
    /// `PaymentSubmitted`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::TradeNotFound`]
    /// - [`DomainError::NotAuthorized`] for a non-party
    /// - [`DomainError::InvalidTransition`] from any other state
    pub async fn raise_dispute(&self, trade_id: TradeId, actor: &Actor) -> DomainResult<Trade> {
        let now = self.clock.now();
        let mut trades = self.trades.write().await;
        let trade = trades
            .get_mut(&trade_id)
            .ok_or_else(|| DomainError::TradeNotFound(trade_id.to_string()))?;

        let is_party =
            &actor.user_id == trade.buyer_id() || &actor.user_id == trade.seller_id();
        if !is_party {
            return Err(DomainError::NotAuthorized(format!(
                "{} is not a party to trade {}",
                actor, trade_id
            )));
        }

        trade.raise_dispute(now)?;
        let snapshot = trade.clone();
        drop(trades);

        if let Err(err) = self
            .publisher
            .publish_dispute_raised(DisputeRaised {
                trade_id,
                raised_by: actor.user_id.clone(),
                occurred_at: now,
            })
            .await
        {
            tracing::warn!(trade_id = %trade_id, error = %err, "event publish failed");
        }
        Ok(snapshot)
    }

    /// Cancels every `PendingPayment` trade whose deadline has passed.
    ///
    /// Idempotent and race-tolerant: trades that reached a terminal state
    /// between collection and cancellation are skipped silently. Returns
    /// the number of trades cancelled by this sweep.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let expired: Vec<TradeId> = {
            let trades = self.trades.read().await;
            trades
                .values()
                .filter(|t| t.is_expired(now))
                .map(Trade::id)
                .collect()
        };

        let mut cancelled = 0;
        for trade_id in expired {
            let mut trades = self.trades.write().await;
            let Some(trade) = trades.get_mut(&trade_id) else {
                continue;
            };
            // Lost the race to a user action; skip.
            if !trade.is_expired(now) {
                continue;
            }
            match self.finalize_cancel(trade, CancelReason::Expired).await {
                Ok(_) => {
                    cancelled += 1;
                    tracing::info!(trade_id = %trade_id, "trade cancelled on expiry");
                }
                Err(err) => {
                    tracing::error!(trade_id = %trade_id, error = %err, "expiry sweep failed");
                }
            }
        }
        cancelled
    }

    async fn finalize_cancel(
        &self,
        trade: &mut Trade,
        reason: CancelReason,
    ) -> DomainResult<Trade> {
        let now = self.clock.now();
        trade.cancel(reason, now)?;
        self.escrow.revert(trade.id()).await?;
        self.catalog
            .release_quantity(trade.ad_id(), trade.quantity())
            .await?;
        let snapshot = trade.clone();

        if let Err(err) = self
            .publisher
            .publish_trade_cancelled(TradeCancelled {
                trade_id: snapshot.id(),
                reason,
                quantity: snapshot.quantity(),
                occurred_at: now,
            })
            .await
        {
            tracing::warn!(trade_id = %snapshot.id(), error = %err, "event publish failed");
        }
        Ok(snapshot)
    }
}
