//! # Application Layer
//!
//! Service orchestration over the domain model.
//!
//! This layer coordinates domain aggregates to perform business
//! operations: pricing, ad inventory, the escrow-backed trade state
//! machine, and background expiry sweeping.

pub mod services;

pub use services::{
    AdCatalog, AdListing, AdvisoryService, EscrowLedger, ExpirySweeper, NoopAdvisory, PriceBook,
    PriceQuote, TradeLifecycle, TradePolicy,
};
