//! # P2P Trade Engine
//!
//! Main entry point for the P2P trade service.

use p2p_trade::application::services::{
    AdCatalog, EscrowLedger, ExpirySweeper, NoopAdvisory, PriceBook, TradeLifecycle,
};
use p2p_trade::config::{AppConfig, LogFormat};
use p2p_trade::domain::events::TracingEventPublisher;
use p2p_trade::domain::value_objects::{RandomIdGenerator, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    info!(
        service = %config.service_name,
        environment = %config.environment,
        "starting P2P trade engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    let clock = Arc::new(SystemClock);
    let ids = Arc::new(RandomIdGenerator);

    let price_book = Arc::new(PriceBook::new(clock.clone()));
    let catalog = Arc::new(AdCatalog::new(price_book.clone(), ids.clone(), clock.clone()));
    let escrow = Arc::new(EscrowLedger::new(clock.clone()));
    let lifecycle = Arc::new(TradeLifecycle::new(
        catalog,
        escrow,
        Arc::new(TracingEventPublisher),
        Arc::new(NoopAdvisory),
        clock,
        ids,
        config.trade.policy(),
    ));

    let sweeper = ExpirySweeper::new(
        lifecycle,
        Duration::from_secs(config.trade.sweep_interval_secs),
    );
    let sweeper_handle = tokio::spawn(async move { sweeper.run().await });

    info!("P2P trade engine started");

    tokio::signal::ctrl_c().await?;
    info!("shutting down P2P trade engine");
    sweeper_handle.abort();

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
