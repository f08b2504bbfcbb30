//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! This module provides newtype wrappers for all domain identifiers,
//! ensuring type safety and preventing accidental mixing of different
//! ID types, plus the [`IdGenerator`] seam used to create fresh ids.
//!
//! ## UUID-based Identifiers
//!
//! - [`AdId`] - Advertisement identifier
//! - [`TradeId`] - Trade identifier
//!
//! ## String-based Identifiers
//!
//! - [`UserId`] - Platform user identifier (supplied by the identity provider)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Advertisement identifier.
///
/// A UUID-based identifier uniquely identifying a seller advertisement.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::ids::AdId;
///
/// let ad_id = AdId::new_v4();
/// println!("Ad: {}", ad_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdId(Uuid);

impl AdId {
    /// Creates a new ad ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random ad ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for AdId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Trade identifier.
///
/// A UUID-based identifier uniquely identifying a trade and its
/// matching escrow hold.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::ids::TradeId;
///
/// let trade_id = TradeId::new_v4();
/// println!("Trade: {}", trade_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Creates a new trade ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random trade ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for TradeId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Platform user identifier.
///
/// A string-based identifier supplied by the external identity provider.
/// The engine treats it as opaque and already authenticated.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::ids::UserId;
///
/// let user = UserId::new("user_42");
/// assert_eq!(user.as_str(), "user_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the user ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the UserId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for UserId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of fresh identifiers.
///
/// Components never call a global generator directly; they receive an
/// implementation of this trait, so tests can substitute a deterministic
/// sequence.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Generates a fresh advertisement ID.
    fn next_ad_id(&self) -> AdId;

    /// Generates a fresh trade ID.
    fn next_trade_id(&self) -> TradeId;
}

/// Production ID generator backed by random UUID v4 values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_ad_id(&self) -> AdId {
        AdId::new_v4()
    }

    fn next_trade_id(&self) -> TradeId {
        TradeId::new_v4()
    }
}

/// Deterministic ID generator for tests.
///
/// Yields UUIDs built from a monotonically increasing counter, so runs
/// are reproducible and ids are still unique within a process.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator starting from zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_uuid(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Uuid::from_u128(u128::from(n) + 1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_ad_id(&self) -> AdId {
        AdId::new(self.next_uuid())
    }

    fn next_trade_id(&self) -> TradeId {
        TradeId::new(self.next_uuid())
    }
}
