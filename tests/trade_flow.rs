//! End-to-end trade lifecycle tests over the public API.

#![allow(clippy::unwrap_used)]

use p2p_trade::application::services::{
    AdCatalog, EscrowLedger, NoopAdvisory, PriceBook, TradeLifecycle, TradePolicy,
};
use p2p_trade::domain::entities::{AdSpec, HoldState, PriceMode};
use p2p_trade::domain::errors::DomainError;
use p2p_trade::domain::events::TracingEventPublisher;
use p2p_trade::domain::value_objects::{
    Actor, Asset, CancelReason, FiatAmount, ManualClock, PaymentMethod, Quantity,
    SequentialIdGenerator, Timestamp, TradeSide, TradeState, UserId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

const UTR: &str = "123456789012";

struct Engine {
    lifecycle: Arc<TradeLifecycle>,
    catalog: Arc<AdCatalog>,
    escrow: Arc<EscrowLedger>,
    price_book: Arc<PriceBook>,
    clock: Arc<ManualClock>,
}

fn engine() -> Engine {
    let clock = Arc::new(ManualClock::starting_at(Timestamp::from_millis(0)));
    let price_book = Arc::new(PriceBook::new(clock.clone()));
    let catalog = Arc::new(AdCatalog::new(
        price_book.clone(),
        Arc::new(SequentialIdGenerator::new()),
        clock.clone(),
    ));
    let escrow = Arc::new(EscrowLedger::new(clock.clone()));
    let lifecycle = Arc::new(TradeLifecycle::new(
        catalog.clone(),
        escrow.clone(),
        Arc::new(TracingEventPublisher),
        Arc::new(NoopAdvisory),
        clock.clone(),
        Arc::new(SequentialIdGenerator::new()),
        TradePolicy::default(),
    ));
    Engine {
        lifecycle,
        catalog,
        escrow,
        price_book,
        clock,
    }
}

fn usdt_ad(owner: &str, price: &str, quantity: &str) -> AdSpec {
    AdSpec {
        owner_id: UserId::new(owner),
        side: TradeSide::Sell,
        asset: Asset::Usdt,
        price_mode: PriceMode::fixed(price.parse().unwrap()),
        min_fiat_limit: "500".parse().unwrap(),
        max_fiat_limit: "50000".parse().unwrap(),
        payment_methods: vec![PaymentMethod::new("UPI"), PaymentMethod::new("IMPS")],
        available_quantity: quantity.parse().unwrap(),
    }
}

fn fiat(s: &str) -> FiatAmount {
    s.parse().unwrap()
}

#[tokio::test]
async fn happy_path_settles_with_correct_fees() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_9", "91.45", "1000"))
        .await
        .unwrap();

    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_4"), fiat("5000"))
        .await
        .unwrap();

    // 1% TDS and 0.2% commission, each on the gross amount.
    assert_eq!(trade.tax_withheld(), fiat("50.00"));
    assert_eq!(trade.platform_fee(), fiat("10.00"));
    assert_eq!(
        trade.quantity().get(),
        Decimal::from(5000) / Decimal::new(9145, 2)
    );

    e.lifecycle.submit_payment(trade.id(), UTR).await.unwrap();
    let settled = e
        .lifecycle
        .release(trade.id(), &Actor::seller("seller_9"))
        .await
        .unwrap();

    assert_eq!(settled.state(), TradeState::Released);
    assert!(settled.state().is_terminal());
    assert_eq!(
        e.escrow.get(trade.id()).await.unwrap().state(),
        HoldState::Released
    );
}

#[tokio::test]
async fn concurrent_start_trades_reserve_exactly_available_inventory() {
    let e = engine();
    // 100 units at price 100; each 2500-fiat trade takes 25 units, so
    // exactly 4 of the 12 attempts can succeed.
    let mut spec = usdt_ad("seller_1", "100", "100");
    spec.min_fiat_limit = "100".parse().unwrap();
    let ad_id = e.catalog.create_ad(spec).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..12 {
        let lifecycle = e.lifecycle.clone();
        handles.push(tokio::spawn(async move {
            lifecycle
                .start_trade(ad_id, UserId::new(format!("buyer_{i}")), fiat("2500"))
                .await
        }));
    }

    let mut succeeded = Vec::new();
    let mut shortfalls = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(trade) => succeeded.push(trade),
            Err(DomainError::InsufficientLiquidity(_)) => shortfalls += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(succeeded.len(), 4);
    assert_eq!(shortfalls, 8);
    assert!(e
        .catalog
        .get_ad(ad_id)
        .await
        .unwrap()
        .available_quantity()
        .is_zero());

    // Every successful trade has its own locked hold.
    for trade in &succeeded {
        assert_eq!(
            e.escrow.get(trade.id()).await.unwrap().state(),
            HoldState::Locked
        );
    }
}

#[tokio::test]
async fn floating_trade_snapshot_survives_price_updates() {
    let e = engine();
    let mut spec = usdt_ad("seller_1", "1", "10000");
    spec.price_mode = PriceMode::Floating;
    let ad_id = e.catalog.create_ad(spec).await.unwrap();

    e.price_book
        .set_price(Asset::Usdt, "91.45".parse().unwrap(), &Actor::system())
        .await;
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();

    let old = e
        .price_book
        .set_price(Asset::Usdt, "95.00".parse().unwrap(), &Actor::system())
        .await
        .unwrap();
    assert_eq!(old.unit_price, "91.45".parse().unwrap());

    // The open trade still carries the creation-time price; only new
    // trades see the update.
    let reloaded = e.lifecycle.get_trade(trade.id()).await.unwrap();
    assert_eq!(reloaded.unit_price(), "91.45".parse().unwrap());

    let second = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_2"), fiat("5000"))
        .await
        .unwrap();
    assert_eq!(second.unit_price(), "95.00".parse().unwrap());
}

#[tokio::test]
async fn late_payment_fails_even_before_any_sweep() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();

    e.clock.advance_minutes(16);

    // No sweep has run; the deadline check alone rejects the payment.
    let result = e.lifecycle.submit_payment(trade.id(), UTR).await;
    assert!(matches!(result, Err(DomainError::TradeExpired(_))));

    // The sweep then cancels it and restores inventory.
    assert_eq!(e.lifecycle.sweep_expired().await, 1);
    let swept = e.lifecycle.get_trade(trade.id()).await.unwrap();
    assert_eq!(swept.state(), TradeState::Cancelled);
    assert_eq!(swept.cancel_reason(), Some(CancelReason::Expired));
    assert_eq!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity(),
        Quantity::new(1000.0).unwrap()
    );
}

#[tokio::test]
async fn terminal_trades_reject_further_transitions() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();
    e.lifecycle.submit_payment(trade.id(), UTR).await.unwrap();

    let seller = Actor::seller("seller_1");
    e.lifecycle.release(trade.id(), &seller).await.unwrap();

    assert!(matches!(
        e.lifecycle.release(trade.id(), &seller).await,
        Err(DomainError::InvalidTransition { .. })
    ));
    assert!(matches!(
        e.lifecycle
            .cancel(trade.id(), &seller, CancelReason::UserRequested)
            .await,
        Err(DomainError::InvalidTransition { .. })
    ));
    assert!(matches!(
        e.lifecycle.submit_payment(trade.id(), UTR).await,
        Err(DomainError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn cancel_roundtrip_restores_inventory_exactly() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();

    let before = e.catalog.get_ad(ad_id).await.unwrap().available_quantity();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("4999.99"))
        .await
        .unwrap();
    assert!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity() < before,
        "reservation must debit inventory"
    );

    e.lifecycle
        .cancel(
            trade.id(),
            &Actor::buyer("buyer_1"),
            CancelReason::UserRequested,
        )
        .await
        .unwrap();

    // Exact restoration, no decimal drift.
    assert_eq!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity(),
        before
    );
    assert_eq!(
        e.escrow.get(trade.id()).await.unwrap().state(),
        HoldState::Reverted
    );
}

#[tokio::test]
async fn dispute_resolved_toward_buyer() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();
    e.lifecycle.submit_payment(trade.id(), UTR).await.unwrap();
    e.lifecycle
        .raise_dispute(trade.id(), &Actor::buyer("buyer_1"))
        .await
        .unwrap();

    let resolved = e
        .lifecycle
        .release(trade.id(), &Actor::arbiter("ops_1"))
        .await
        .unwrap();

    assert_eq!(resolved.state(), TradeState::Released);
    assert_eq!(
        e.escrow.get(trade.id()).await.unwrap().state(),
        HoldState::Released
    );
    // Inventory stays debited on a released trade.
    assert!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity()
            < Quantity::new(1000.0).unwrap()
    );
}

#[tokio::test]
async fn dispute_resolved_toward_seller() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();
    e.lifecycle.submit_payment(trade.id(), UTR).await.unwrap();
    e.lifecycle
        .raise_dispute(trade.id(), &Actor::seller("seller_1"))
        .await
        .unwrap();

    let resolved = e
        .lifecycle
        .cancel(
            trade.id(),
            &Actor::arbiter("ops_1"),
            CancelReason::DisputeResolved,
        )
        .await
        .unwrap();

    assert_eq!(resolved.state(), TradeState::Cancelled);
    assert_eq!(resolved.cancel_reason(), Some(CancelReason::DisputeResolved));
    assert_eq!(
        e.escrow.get(trade.id()).await.unwrap().state(),
        HoldState::Reverted
    );
    // Inventory restored in full.
    assert_eq!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity(),
        Quantity::new(1000.0).unwrap()
    );
}

#[tokio::test]
async fn sweep_races_with_user_cancel_without_double_counting() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let trade = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();

    e.clock.advance_minutes(16);

    // User cancellation lands first; the sweep must treat the trade as
    // already handled.
    e.lifecycle
        .cancel(
            trade.id(),
            &Actor::buyer("buyer_1"),
            CancelReason::UserRequested,
        )
        .await
        .unwrap();
    assert_eq!(e.lifecycle.sweep_expired().await, 0);

    let cancelled = e.lifecycle.get_trade(trade.id()).await.unwrap();
    assert_eq!(cancelled.cancel_reason(), Some(CancelReason::UserRequested));
    assert_eq!(
        e.catalog.get_ad(ad_id).await.unwrap().available_quantity(),
        Quantity::new(1000.0).unwrap()
    );
}

#[tokio::test]
async fn expiry_applies_per_trade_not_per_sweep() {
    let e = engine();
    let ad_id = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();

    let early = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_1"), fiat("5000"))
        .await
        .unwrap();
    e.clock.advance_minutes(10);
    let late = e
        .lifecycle
        .start_trade(ad_id, UserId::new("buyer_2"), fiat("5000"))
        .await
        .unwrap();

    e.clock.advance_minutes(6); // early at 16m (expired), late at 6m
    assert_eq!(e.lifecycle.sweep_expired().await, 1);
    assert_eq!(
        e.lifecycle.get_trade(early.id()).await.unwrap().state(),
        TradeState::Cancelled
    );
    assert_eq!(
        e.lifecycle.get_trade(late.id()).await.unwrap().state(),
        TradeState::PendingPayment
    );

    e.clock.advance_minutes(10); // late now at 16m
    assert_eq!(e.lifecycle.sweep_expired().await, 1);
    assert_eq!(
        e.lifecycle.get_trade(late.id()).await.unwrap().state(),
        TradeState::Cancelled
    );
}

#[tokio::test]
async fn listing_reflects_lifecycle_side_effects() {
    let e = engine();
    let first = e
        .catalog
        .create_ad(usdt_ad("seller_1", "91.45", "1000"))
        .await
        .unwrap();
    let second = e
        .catalog
        .create_ad(usdt_ad("seller_2", "92.00", "500"))
        .await
        .unwrap();

    let listings = e.catalog.list_ads(Some(Asset::Usdt), None).await;
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].ad.id(), first);
    assert_eq!(listings[1].ad.id(), second);
    assert_eq!(
        listings[0].effective_unit_price,
        Some("91.45".parse().unwrap())
    );

    e.catalog
        .close_ad(second, &Actor::seller("seller_2"))
        .await
        .unwrap();
    let listings = e.catalog.list_ads(Some(Asset::Usdt), None).await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].ad.id(), first);
}
