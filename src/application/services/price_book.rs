//! # Price Book
//!
//! The reference price table: one current quote per asset, atomically
//! superseded by updates.
//!
//! Floating-price advertisements resolve against the book lazily at read
//! or trade time; updating a quote never touches ads or open trades.
//!
//! # Examples
//!
//! ```
//! use p2p_trade::application::services::PriceBook;
//! use p2p_trade::domain::value_objects::{Actor, Asset, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let book = PriceBook::new(Arc::new(SystemClock));
//! let admin = Actor::arbiter("ops_1");
//!
//! book.set_price(Asset::Usdt, "91.45".parse().unwrap(), &admin).await;
//! let quote = book.get_price(Asset::Usdt).await.unwrap();
//! assert_eq!(quote.unit_price, "91.45".parse().unwrap());
//! # }
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Actor, Asset, Clock, Price, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The current reference quote for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// The quoted asset.
    pub asset: Asset,
    /// Fiat per unit of the asset.
    pub unit_price: Price,
    /// When the quote was recorded.
    pub observed_at: Timestamp,
}

/// In-memory reference price table.
#[derive(Debug)]
pub struct PriceBook {
    quotes: RwLock<HashMap<Asset, PriceQuote>>,
    clock: Arc<dyn Clock>,
}

impl PriceBook {
    /// Creates an empty price book.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the current quote for `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AssetNotFound`] if no quote has been set.
    pub async fn get_price(&self, asset: Asset) -> DomainResult<PriceQuote> {
        self.quotes
            .read()
            .await
            .get(&asset)
            .copied()
            .ok_or_else(|| DomainError::AssetNotFound(asset.to_string()))
    }

    /// Replaces the quote for `asset`, returning the superseded quote.
    ///
    /// [`Price`] construction already rejects non-positive values, so any
    /// price that reaches here is valid. The replacement is atomic: readers
    /// see either the old quote or the new one, never a mixture.
    pub async fn set_price(&self, asset: Asset, price: Price, actor: &Actor) -> Option<PriceQuote> {
        let quote = PriceQuote {
            asset,
            unit_price: price,
            observed_at: self.clock.now(),
        };
        let previous = self.quotes.write().await.insert(asset, quote);
        tracing::info!(
            asset = %asset,
            new_price = %price,
            old_price = previous.map(|q| q.unit_price.to_string()),
            actor = %actor,
            "reference price updated"
        );
        previous
    }
}
