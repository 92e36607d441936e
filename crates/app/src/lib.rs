//! # verasync-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StatusTransport` — one long-poll request against the hub
//!   - `DeviceDirectory` — device snapshots, name and room lookups
//!   - `EventSink` — fire-and-forget delivery of outbound device events
//! - Provide the synchronization use-cases:
//!   - `StatusPoller` — carries the poll token between requests
//!   - `DeviceCache` — lazily populated mirror of device attributes
//!   - `ChangeDetector` — turns raw deltas into typed change events
//!   - `Dispatcher` — routes change events to per-variable handlers
//!   - `SyncLoop` — the resilient connected/disconnected polling loop
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `verasync-domain` only (plus `tokio` for time and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
