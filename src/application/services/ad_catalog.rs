//! # Advertisement Catalog
//!
//! Registry of posted advertisements with atomic inventory reservation.
//!
//! Each advertisement lives behind its own async mutex so reservation is
//! a check-and-decrement with no window for oversell, while operations on
//! different ads never contend. The outer map lock is held only long
//! enough to find the ad's mutex.
//!
//! Floating prices are resolved lazily against the [`PriceBook`] at read
//! or trade time; a reference price update never walks the catalog.

use crate::application::services::price_book::PriceBook;
use crate::domain::entities::{AdSpec, Advertisement, PriceMode};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Actor, AdId, Asset, Clock, IdGenerator, Price, Quantity, TradeSide,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A catalog listing: an ad snapshot with its effective price resolved.
///
/// `effective_unit_price` is `None` for a floating ad whose asset has no
/// current reference quote; such ads are listed but not tradeable until a
/// quote arrives.
#[derive(Debug, Clone, Serialize)]
pub struct AdListing {
    /// Snapshot of the advertisement.
    pub ad: Advertisement,
    /// Resolved unit price, if one is available.
    pub effective_unit_price: Option<Price>,
}

#[derive(Debug, Default)]
struct AdStore {
    ads: HashMap<AdId, Arc<Mutex<Advertisement>>>,
    // Insertion order for deterministic listing.
    order: Vec<AdId>,
}

/// In-memory advertisement catalog.
#[derive(Debug)]
pub struct AdCatalog {
    store: RwLock<AdStore>,
    price_book: Arc<PriceBook>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl AdCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new(
        price_book: Arc<PriceBook>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: RwLock::new(AdStore::default()),
            price_book,
            ids,
            clock,
        }
    }

    /// Posts a new advertisement.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the spec violates the ad invariants
    /// (limits ordering, empty payment methods).
    pub async fn create_ad(&self, spec: AdSpec) -> DomainResult<AdId> {
        let id = self.ids.next_ad_id();
        let ad = Advertisement::create(id, spec, self.clock.now())?;
        tracing::info!(ad_id = %id, ad = %ad, "advertisement posted");

        let mut store = self.store.write().await;
        store.ads.insert(id, Arc::new(Mutex::new(ad)));
        store.order.push(id);
        Ok(id)
    }

    /// Returns a snapshot of an advertisement.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AdNotFound`] if no such ad exists.
    pub async fn get_ad(&self, ad_id: AdId) -> DomainResult<Advertisement> {
        let slot = self.find(ad_id).await?;
        let ad = slot.lock().await;
        Ok(ad.clone())
    }

    /// Lists open advertisements in insertion order, optionally filtered
    /// by asset and side, with floating prices resolved against the
    /// current reference quotes.
    pub async fn list_ads(&self, asset: Option<Asset>, side: Option<TradeSide>) -> Vec<AdListing> {
        let slots: Vec<Arc<Mutex<Advertisement>>> = {
            let store = self.store.read().await;
            store
                .order
                .iter()
                .filter_map(|id| store.ads.get(id))
                .cloned()
                .collect()
        };

        let mut listings = Vec::new();
        for slot in slots {
            let ad = slot.lock().await.clone();
            if ad.is_closed() {
                continue;
            }
            if asset.is_some_and(|a| a != ad.asset()) {
                continue;
            }
            if side.is_some_and(|s| s != ad.side()) {
                continue;
            }
            let effective_unit_price = self.resolve_price(&ad).await.ok();
            listings.push(AdListing {
                ad,
                effective_unit_price,
            });
        }
        listings
    }

    /// Resolves the effective unit price of an advertisement.
    ///
    /// Fixed ads carry their own price; floating ads take the current
    /// reference quote for their asset.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AssetNotFound`] for a floating ad whose
    /// asset has no current quote.
    pub async fn resolve_price(&self, ad: &Advertisement) -> DomainResult<Price> {
        match ad.price_mode() {
            PriceMode::Fixed { unit_price } => Ok(unit_price),
            PriceMode::Floating => Ok(self.price_book.get_price(ad.asset()).await?.unit_price),
        }
    }

    /// Atomically reserves `quantity` from an advertisement's inventory.
    ///
    /// # Errors
    ///
    /// - [`DomainError::AdNotFound`] if no such ad exists
    /// - [`DomainError::AdClosed`] if the ad is closed
    /// - [`DomainError::InsufficientLiquidity`] on shortfall
    pub async fn reserve_quantity(&self, ad_id: AdId, quantity: Quantity) -> DomainResult<()> {
        let slot = self.find(ad_id).await?;
        let mut ad = slot.lock().await;
        ad.reserve(quantity)?;
        tracing::debug!(
            ad_id = %ad_id,
            reserved = %quantity,
            remaining = %ad.available_quantity(),
            "inventory reserved"
        );
        Ok(())
    }

    /// Returns `quantity` to an advertisement's inventory.
    ///
    /// Used both by cancellation/expiry and as the compensation step when
    /// trade creation fails after the reserve. Succeeds even on a closed
    /// ad: a cancelled trade's inventory always goes back.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AdNotFound`] if no such ad exists.
    pub async fn release_quantity(&self, ad_id: AdId, quantity: Quantity) -> DomainResult<()> {
        let slot = self.find(ad_id).await?;
        let mut ad = slot.lock().await;
        ad.release(quantity)?;
        tracing::debug!(
            ad_id = %ad_id,
            released = %quantity,
            remaining = %ad.available_quantity(),
            "inventory released"
        );
        Ok(())
    }

    /// Closes an advertisement to new trades. Idempotent.
    ///
    /// Open trades against the ad are unaffected; they settle normally.
    ///
    /// # Errors
    ///
    /// - [`DomainError::AdNotFound`] if no such ad exists
    /// - [`DomainError::NotAuthorized`] unless the actor is the owner,
    ///   an arbiter, or the system
    pub async fn close_ad(&self, ad_id: AdId, actor: &Actor) -> DomainResult<()> {
        let slot = self.find(ad_id).await?;
        let mut ad = slot.lock().await;
        if &actor.user_id != ad.owner_id() && !actor.is_arbiter() && !actor.is_system() {
            return Err(DomainError::NotAuthorized(format!(
                "{} may not close ad {}",
                actor, ad_id
            )));
        }
        ad.close();
        tracing::info!(ad_id = %ad_id, actor = %actor, "advertisement closed");
        Ok(())
    }

    async fn find(&self, ad_id: AdId) -> DomainResult<Arc<Mutex<Advertisement>>> {
        self.store
            .read()
            .await
            .ads
            .get(&ad_id)
            .cloned()
            .ok_or_else(|| DomainError::AdNotFound(ad_id.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        ManualClock, PaymentMethod, SequentialIdGenerator, Timestamp, UserId,
    };

    fn test_catalog() -> AdCatalog {
        let clock = Arc::new(ManualClock::starting_at(Timestamp::from_millis(0)));
        let price_book = Arc::new(PriceBook::new(clock.clone()));
        AdCatalog::new(price_book, Arc::new(SequentialIdGenerator::new()), clock)
    }

    fn catalog_with_quote() -> (AdCatalog, Arc<PriceBook>) {
        let clock = Arc::new(ManualClock::starting_at(Timestamp::from_millis(0)));
        let price_book = Arc::new(PriceBook::new(clock.clone()));
        let catalog = AdCatalog::new(
            price_book.clone(),
            Arc::new(SequentialIdGenerator::new()),
            clock,
        );
        (catalog, price_book)
    }

    fn sell_usdt_spec(owner: &str) -> AdSpec {
        AdSpec {
            owner_id: UserId::new(owner),
            side: TradeSide::Sell,
            asset: Asset::Usdt,
            price_mode: PriceMode::fixed("91.45".parse().unwrap()),
            min_fiat_limit: "500".parse().unwrap(),
            max_fiat_limit: "50000".parse().unwrap(),
            payment_methods: vec![PaymentMethod::new("UPI")],
            available_quantity: "1000".parse().unwrap(),
        }
    }

    fn floating_spec(owner: &str) -> AdSpec {
        AdSpec {
            price_mode: PriceMode::Floating,
            ..sell_usdt_spec(owner)
        }
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn create_and_get_roundtrip() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let ad = catalog.get_ad(id).await.unwrap();
            assert_eq!(ad.id(), id);
            assert_eq!(ad.owner_id(), &UserId::new("seller_1"));
            assert!(!ad.is_closed());
        }

        #[tokio::test]
        async fn invalid_limits_rejected() {
            let catalog = test_catalog();
            let mut spec = sell_usdt_spec("seller_1");
            spec.min_fiat_limit = "60000".parse().unwrap();
            let result = catalog.create_ad(spec).await;
            assert!(matches!(result, Err(DomainError::InvalidLimits(_))));
        }

        #[tokio::test]
        async fn get_missing_ad_fails() {
            let catalog = test_catalog();
            let result = catalog.get_ad(AdId::new_v4()).await;
            assert!(matches!(result, Err(DomainError::AdNotFound(_))));
        }
    }

    mod listing {
        use super::*;

        #[tokio::test]
        async fn insertion_order_preserved() {
            let catalog = test_catalog();
            let first = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let second = catalog.create_ad(sell_usdt_spec("seller_2")).await.unwrap();
            let third = catalog.create_ad(sell_usdt_spec("seller_3")).await.unwrap();

            let listings = catalog.list_ads(None, None).await;
            let ids: Vec<AdId> = listings.iter().map(|l| l.ad.id()).collect();
            assert_eq!(ids, vec![first, second, third]);
        }

        #[tokio::test]
        async fn filters_by_asset_and_side() {
            let catalog = test_catalog();
            catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let mut btc_spec = sell_usdt_spec("seller_2");
            btc_spec.asset = Asset::Btc;
            catalog.create_ad(btc_spec).await.unwrap();

            let usdt_only = catalog.list_ads(Some(Asset::Usdt), None).await;
            assert_eq!(usdt_only.len(), 1);
            assert_eq!(usdt_only[0].ad.asset(), Asset::Usdt);

            let buys = catalog.list_ads(None, Some(TradeSide::Buy)).await;
            assert!(buys.is_empty());
        }

        #[tokio::test]
        async fn closed_ads_not_listed() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            catalog
                .close_ad(id, &Actor::seller("seller_1"))
                .await
                .unwrap();
            assert!(catalog.list_ads(None, None).await.is_empty());
        }

        #[tokio::test]
        async fn floating_ad_without_quote_has_no_price() {
            let catalog = test_catalog();
            catalog.create_ad(floating_spec("seller_1")).await.unwrap();
            let listings = catalog.list_ads(None, None).await;
            assert_eq!(listings.len(), 1);
            assert!(listings[0].effective_unit_price.is_none());
        }

        #[tokio::test]
        async fn floating_ad_tracks_current_quote() {
            let (catalog, price_book) = catalog_with_quote();
            catalog.create_ad(floating_spec("seller_1")).await.unwrap();

            price_book
                .set_price(Asset::Usdt, "92.10".parse().unwrap(), &Actor::system())
                .await;
            let listings = catalog.list_ads(None, None).await;
            assert_eq!(
                listings[0].effective_unit_price,
                Some("92.10".parse().unwrap())
            );

            price_book
                .set_price(Asset::Usdt, "93.00".parse().unwrap(), &Actor::system())
                .await;
            let listings = catalog.list_ads(None, None).await;
            assert_eq!(
                listings[0].effective_unit_price,
                Some("93.00".parse().unwrap())
            );
        }
    }

    mod inventory {
        use super::*;

        #[tokio::test]
        async fn reserve_then_release_restores_exactly() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let qty: Quantity = "123.456".parse().unwrap();

            catalog.reserve_quantity(id, qty).await.unwrap();
            assert_eq!(
                catalog.get_ad(id).await.unwrap().available_quantity(),
                "876.544".parse().unwrap()
            );

            catalog.release_quantity(id, qty).await.unwrap();
            assert_eq!(
                catalog.get_ad(id).await.unwrap().available_quantity(),
                "1000".parse().unwrap()
            );
        }

        #[tokio::test]
        async fn reserve_beyond_available_fails() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let result = catalog.reserve_quantity(id, "1001".parse().unwrap()).await;
            assert!(matches!(
                result,
                Err(DomainError::InsufficientLiquidity(_))
            ));
        }

        #[tokio::test]
        async fn concurrent_reserves_never_oversell() {
            let catalog = Arc::new(test_catalog());
            let mut spec = sell_usdt_spec("seller_1");
            spec.available_quantity = "50".parse().unwrap();
            let id = catalog.create_ad(spec).await.unwrap();

            let mut handles = Vec::new();
            for _ in 0..20 {
                let catalog = catalog.clone();
                handles.push(tokio::spawn(async move {
                    catalog.reserve_quantity(id, "10".parse().unwrap()).await
                }));
            }

            let mut successes = 0;
            let mut shortfalls = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(()) => successes += 1,
                    Err(DomainError::InsufficientLiquidity(_)) => shortfalls += 1,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }

            assert_eq!(successes, 5);
            assert_eq!(shortfalls, 15);
            assert!(catalog
                .get_ad(id)
                .await
                .unwrap()
                .available_quantity()
                .is_zero());
        }

        #[tokio::test]
        async fn reserve_on_closed_ad_fails() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            catalog
                .close_ad(id, &Actor::seller("seller_1"))
                .await
                .unwrap();
            let result = catalog.reserve_quantity(id, "1".parse().unwrap()).await;
            assert!(matches!(result, Err(DomainError::AdClosed(_))));
        }

        #[tokio::test]
        async fn release_on_closed_ad_succeeds() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            catalog.reserve_quantity(id, "10".parse().unwrap()).await.unwrap();
            catalog
                .close_ad(id, &Actor::seller("seller_1"))
                .await
                .unwrap();
            catalog.release_quantity(id, "10".parse().unwrap()).await.unwrap();
            assert_eq!(
                catalog.get_ad(id).await.unwrap().available_quantity(),
                "1000".parse().unwrap()
            );
        }
    }

    mod close {
        use super::*;

        #[tokio::test]
        async fn stranger_cannot_close() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let result = catalog.close_ad(id, &Actor::seller("seller_2")).await;
            assert!(matches!(result, Err(DomainError::NotAuthorized(_))));
        }

        #[tokio::test]
        async fn arbiter_can_close() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            catalog.close_ad(id, &Actor::arbiter("ops_1")).await.unwrap();
            assert!(catalog.get_ad(id).await.unwrap().is_closed());
        }

        #[tokio::test]
        async fn close_is_idempotent() {
            let catalog = test_catalog();
            let id = catalog.create_ad(sell_usdt_spec("seller_1")).await.unwrap();
            let owner = Actor::seller("seller_1");
            catalog.close_ad(id, &owner).await.unwrap();
            catalog.close_ad(id, &owner).await.unwrap();
            assert!(catalog.get_ad(id).await.unwrap().is_closed());
        }
    }
}
