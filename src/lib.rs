//! # P2P Trade Engine
//!
//! Escrow-backed peer-to-peer fiat-to-crypto trade lifecycle engine:
//! reference pricing, seller advertisements, a trade state machine with
//! TDS/commission computation, and an escrow ledger.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Entities, value objects, errors, and domain events
//! - **Application Layer** (`application`): Stateful services orchestrating the trade lifecycle
//!
//! All monetary arithmetic is decimal and checked; floats never enter
//! persisted state. Settlement networks, custody, and identity are
//! external collaborators: the engine records intent and enforces the
//! state contract, nothing more.
//!
//! ## Example
//!
//! ```rust,ignore
//! use p2p_trade::application::services::TradeLifecycle;
//!
//! let trade = lifecycle
//!     .start_trade(ad_id, buyer_id, requested_fiat)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
