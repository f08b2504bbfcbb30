//! # Advertisement Aggregate
//!
//! A seller's (or buyer's) posted offer: price mode, fiat limits,
//! accepted payment methods, and remaining inventory.
//!
//! Inventory moves only through [`Advertisement::reserve`] and
//! [`Advertisement::release`], which preserve the non-negativity
//! invariant; the catalog serializes those calls per ad.
//!
//! # Examples
//!
//! ```
//! use p2p_trade::domain::entities::advertisement::{AdSpec, Advertisement, PriceMode};
//! use p2p_trade::domain::value_objects::{
//!     AdId, Asset, FiatAmount, PaymentMethod, Price, Quantity, Timestamp, TradeSide, UserId,
//! };
//!
//! let spec = AdSpec {
//!     owner_id: UserId::new("seller_1"),
//!     side: TradeSide::Sell,
//!     asset: Asset::Usdt,
//!     price_mode: PriceMode::fixed("91.45".parse().unwrap()),
//!     min_fiat_limit: "500".parse().unwrap(),
//!     max_fiat_limit: "50000".parse().unwrap(),
//!     payment_methods: vec![PaymentMethod::new("UPI")],
//!     available_quantity: "1000".parse().unwrap(),
//! };
//!
//! let ad = Advertisement::create(AdId::new_v4(), spec, Timestamp::now()).unwrap();
//! assert!(!ad.is_closed());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AdId, Asset, FiatAmount, PaymentMethod, Price, Quantity, Timestamp, TradeSide, UserId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an advertisement prices the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceMode {
    /// Price locked at posting time.
    Fixed {
        /// The posted unit price.
        unit_price: Price,
    },
    /// Price tracks the live reference quote; resolved at read time.
    Floating,
}

impl PriceMode {
    /// Convenience constructor for a fixed price.
    #[must_use]
    pub const fn fixed(unit_price: Price) -> Self {
        Self::Fixed { unit_price }
    }
}

impl fmt::Display for PriceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { unit_price } => write!(f, "FIXED@{}", unit_price),
            Self::Floating => write!(f, "FLOATING"),
        }
    }
}

/// Validated input for creating an advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdSpec {
    /// The posting user.
    pub owner_id: UserId,
    /// Buy or sell, from the poster's perspective.
    pub side: TradeSide,
    /// The asset being offered.
    pub asset: Asset,
    /// Fixed or floating pricing.
    pub price_mode: PriceMode,
    /// Minimum fiat amount per trade.
    pub min_fiat_limit: FiatAmount,
    /// Maximum fiat amount per trade.
    pub max_fiat_limit: FiatAmount,
    /// Accepted fiat payment methods; must be non-empty.
    pub payment_methods: Vec<PaymentMethod>,
    /// Inventory available for escrow.
    pub available_quantity: Quantity,
}

impl AdSpec {
    /// Validates the spec invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLimits`] if `min_fiat_limit > max_fiat_limit`
    /// and [`DomainError::ValidationError`] if no payment method is accepted.
    pub fn validate(&self) -> DomainResult<()> {
        if self.min_fiat_limit > self.max_fiat_limit {
            return Err(DomainError::InvalidLimits(format!(
                "min limit {} exceeds max limit {}",
                self.min_fiat_limit, self.max_fiat_limit
            )));
        }
        if self.payment_methods.is_empty() {
            return Err(DomainError::ValidationError(
                "at least one payment method is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A posted advertisement with live inventory.
///
/// # Invariants
///
/// - `min_fiat_limit <= max_fiat_limit`
/// - `available_quantity >= 0` (enforced by [`Quantity`])
/// - Inventory changes only via [`reserve`](Self::reserve) / [`release`](Self::release)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    id: AdId,
    owner_id: UserId,
    side: TradeSide,
    asset: Asset,
    price_mode: PriceMode,
    min_fiat_limit: FiatAmount,
    max_fiat_limit: FiatAmount,
    payment_methods: Vec<PaymentMethod>,
    available_quantity: Quantity,
    closed: bool,
    created_at: Timestamp,
}

impl Advertisement {
    /// Creates an advertisement from a validated spec.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the spec violates the ad invariants.
    pub fn create(id: AdId, spec: AdSpec, created_at: Timestamp) -> DomainResult<Self> {
        spec.validate()?;
        Ok(Self {
            id,
            owner_id: spec.owner_id,
            side: spec.side,
            asset: spec.asset,
            price_mode: spec.price_mode,
            min_fiat_limit: spec.min_fiat_limit,
            max_fiat_limit: spec.max_fiat_limit,
            payment_methods: spec.payment_methods,
            available_quantity: spec.available_quantity,
            closed: false,
            created_at,
        })
    }

    // ========== Accessors ==========

    /// Returns the advertisement ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> AdId {
        self.id
    }

    /// Returns the posting user.
    #[inline]
    #[must_use]
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns the advertisement side.
    #[inline]
    #[must_use]
    pub fn side(&self) -> TradeSide {
        self.side
    }

    /// Returns the offered asset.
    #[inline]
    #[must_use]
    pub fn asset(&self) -> Asset {
        self.asset
    }

    /// Returns the pricing mode.
    #[inline]
    #[must_use]
    pub fn price_mode(&self) -> PriceMode {
        self.price_mode
    }

    /// Returns the minimum fiat amount per trade.
    #[inline]
    #[must_use]
    pub fn min_fiat_limit(&self) -> FiatAmount {
        self.min_fiat_limit
    }

    /// Returns the maximum fiat amount per trade.
    #[inline]
    #[must_use]
    pub fn max_fiat_limit(&self) -> FiatAmount {
        self.max_fiat_limit
    }

    /// Returns the accepted payment methods.
    #[inline]
    #[must_use]
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// Returns the inventory available for new trades.
    #[inline]
    #[must_use]
    pub fn available_quantity(&self) -> Quantity {
        self.available_quantity
    }

    /// Returns true if the ad no longer accepts trades.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns when the ad was posted.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true if `amount` falls within the ad's fiat limits.
    #[inline]
    #[must_use]
    pub fn within_limits(&self, amount: FiatAmount) -> bool {
        amount >= self.min_fiat_limit && amount <= self.max_fiat_limit
    }

    // ========== Mutations ==========

    /// Debits `quantity` from available inventory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InsufficientLiquidity`] if less than `quantity`
    /// is available, and [`DomainError::AdClosed`] if the ad is closed.
    pub fn reserve(&mut self, quantity: Quantity) -> DomainResult<()> {
        if self.closed {
            return Err(DomainError::AdClosed(self.id.to_string()));
        }
        let remaining = self
            .available_quantity
            .safe_sub(quantity)
            .map_err(|_| DomainError::InsufficientLiquidity(self.id.to_string()))?;
        self.available_quantity = remaining;
        Ok(())
    }

    /// Credits `quantity` back to available inventory.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the credit overflows.
    pub fn release(&mut self, quantity: Quantity) -> DomainResult<()> {
        self.available_quantity = self.available_quantity.safe_add(quantity)?;
        Ok(())
    }

    /// Closes the ad to new trades. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl fmt::Display for Advertisement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ad({} {} {} {} avail={})",
            self.id, self.side, self.asset, self.price_mode, self.available_quantity
        )
    }
}
