//! # Application Services
//!
//! Stateful components that orchestrate the domain model:
//!
//! - [`PriceBook`]: reference price table
//! - [`AdCatalog`]: advertisement registry with atomic reservation
//! - [`EscrowLedger`]: per-trade escrow holds
//! - [`TradeLifecycle`]: the trade state machine
//! - [`ExpirySweeper`]: background expiry cancellation
//! - [`AdvisoryService`]: optional risk-note seam

pub mod ad_catalog;
pub mod advisory;
pub mod escrow_ledger;
pub mod price_book;
pub mod sweeper;
pub mod trade_lifecycle;

pub use ad_catalog::{AdCatalog, AdListing};
pub use advisory::{AdvisoryService, NoopAdvisory};
pub use escrow_ledger::EscrowLedger;
pub use price_book::{PriceBook, PriceQuote};
pub use sweeper::ExpirySweeper;
pub use trade_lifecycle::{TradeLifecycle, TradePolicy};
