//! # Domain Entities
//!
//! Aggregates with identity and lifecycle: advertisements, trades, and
//! escrow holds.

pub mod advertisement;
pub mod escrow_hold;
pub mod trade;

pub use advertisement::{AdSpec, Advertisement, PriceMode};
pub use escrow_hold::{EscrowHold, HoldState};
pub use trade::{Trade, TradeSnapshot};
