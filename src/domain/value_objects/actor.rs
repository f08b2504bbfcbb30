//! # Actor
//!
//! Who is performing a lifecycle operation.
//!
//! The identity provider authenticates users upstream; the engine only
//! needs the caller's id and role to enforce who may drive which
//! transition (e.g. only an arbiter may resolve a dispute).

use super::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role under which an actor performs an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// The buyer on the trade.
    Buyer,
    /// The seller on the trade.
    Seller,
    /// A platform arbiter resolving disputes.
    Arbiter,
    /// The system itself (expiry sweeping).
    System,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
            Self::Arbiter => "ARBITER",
            Self::System => "SYSTEM",
        };
        write!(f, "{}", s)
    }
}

/// An authenticated caller with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier from the identity provider.
    pub user_id: UserId,
    /// Role claimed for this operation.
    pub role: ActorRole,
}

impl Actor {
    /// Creates an actor with the given id and role.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: ActorRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Creates a buyer actor.
    #[must_use]
    pub fn buyer(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, ActorRole::Buyer)
    }

    /// Creates a seller actor.
    #[must_use]
    pub fn seller(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, ActorRole::Seller)
    }

    /// Creates an arbiter actor.
    #[must_use]
    pub fn arbiter(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, ActorRole::Arbiter)
    }

    /// Creates the system actor used by the expiry sweeper.
    #[must_use]
    pub fn system() -> Self {
        Self::new("system", ActorRole::System)
    }

    /// Returns true if the actor holds the arbiter role.
    #[inline]
    #[must_use]
    pub fn is_arbiter(&self) -> bool {
        self.role == ActorRole::Arbiter
    }

    /// Returns true if the actor is the system.
    #[inline]
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == ActorRole::System
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.role, self.user_id)
    }
}
