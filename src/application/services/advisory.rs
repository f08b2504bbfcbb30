//! # Advisory Seam
//!
//! Optional human-readable risk notes attached to a freshly created
//! trade. Advisory output is informational only: a failing or slow
//! advisory never gates a lifecycle transition.

use crate::domain::entities::Trade;
use async_trait::async_trait;
use std::fmt;

/// Produces an optional advisory note for a trade.
#[async_trait]
pub trait AdvisoryService: Send + Sync + fmt::Debug {
    /// Returns an advisory note for the trade, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the advisory backend fails; callers log and
    /// continue.
    async fn advise(&self, trade: &Trade) -> Result<Option<String>, String>;
}

/// Advisory implementation that never has anything to say.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAdvisory;

#[async_trait]
impl AdvisoryService for NoopAdvisory {
    async fn advise(&self, _trade: &Trade) -> Result<Option<String>, String> {
        Ok(None)
    }
}
