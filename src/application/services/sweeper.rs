//! # Expiry Sweeper
//!
//! Background task that periodically cancels trades whose payment window
//! has lapsed.
//!
//! The sweeper is a liveness aid, not a correctness requirement:
//! [`TradeLifecycle::submit_payment`] enforces the deadline itself, so a
//! late payment fails even if no sweep has run.

use crate::application::services::trade_lifecycle::TradeLifecycle;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Periodic expiry sweep over the trade book.
#[derive(Debug)]
pub struct ExpirySweeper {
    lifecycle: Arc<TradeLifecycle>,
    period: Duration,
}

impl ExpirySweeper {
    /// Creates a sweeper that runs every `period`.
    #[must_use]
    pub fn new(lifecycle: Arc<TradeLifecycle>, period: Duration) -> Self {
        Self { lifecycle, period }
    }

    /// Runs the sweep loop until the task is aborted.
    pub async fn run(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let cancelled = self.lifecycle.sweep_expired().await;
            if cancelled > 0 {
                tracing::info!(cancelled, "expiry sweep completed");
            } else {
                tracing::debug!("expiry sweep found nothing to do");
            }
        }
    }
}
