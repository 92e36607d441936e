//! # verasync-adapter-vera-http
//!
//! HTTP adapter for a Vera home-automation hub (port 3480).
//!
//! ## What it provides
//!
//! | Port / feature | Endpoint |
//! |----------------|----------|
//! | `StatusTransport` | `data_request?id=lu_status` (long-poll) |
//! | `DeviceDirectory` | `data_request?id=user_data` and `id=status` |
//! | switch / dimmer control | `data_request?id=action` |
//!
//! The `user_data` catalogue is downloaded once per client and shared by
//! its clones.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `verasync-app` and `verasync-domain`.

mod client;
mod config;
mod control;
mod error;
mod poller;
mod wire;

pub use client::{CONTROLLER_NAME, NO_ROOM, UNKNOWN_ROOM, VeraClient};
pub use config::VeraConfig;
pub use error::VeraHttpError;
