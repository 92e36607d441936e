//! # verasyncd — Vera sync daemon
//!
//! Composition root that wires the hub adapter into the sync loop.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the Vera HTTP client (poll transport and device directory)
//! - Construct the poller, device cache, dispatcher and sync loop
//! - Log every outbound device event from the in-process bus
//! - Stop cleanly on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use verasync_adapter_vera_http::VeraClient;
use verasync_app::event_bus::InProcessEventBus;
use verasync_app::services::device_cache::DeviceCache;
use verasync_app::services::dispatcher::Dispatcher;
use verasync_app::services::status_poller::StatusPoller;
use verasync_app::services::sync_loop::SyncLoop;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Hub
    let client = VeraClient::new(&config.hub)?;
    tracing::info!(hub = %client.base_url(), "verasyncd starting");

    // Event bus
    let bus = Arc::new(InProcessEventBus::new(256));
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(event = %json, "device event"),
                    Err(err) => tracing::warn!(error = %err, "unable to encode device event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger lagging behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Sync loop
    let poller = StatusPoller::new(client.clone()).with_grace(config.polling.grace());
    let sync = SyncLoop::new(poller, DeviceCache::new(client), Dispatcher::new(bus))
        .with_config(config.polling.loop_config());

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                shutdown.cancel();
            }
            Err(err) => tracing::error!(error = %err, "unable to listen for Ctrl-C"),
        }
    });

    let sync = sync.run(cancel).await;
    for device in sync.cache().devices() {
        let (label, values) = device.dump();
        tracing::debug!(device = %label, ?values, "last known state");
    }
    tracing::info!(devices = sync.cache().len(), "verasyncd stopped");
    Ok(())
}
