//! # verasync-domain
//!
//! Pure domain model for mirroring the device state of a Vera hub.
//!
//! ## Responsibilities
//! - Foundational types: numeric identifiers, error conventions, timestamps
//! - Define **Devices** and their typed **Attributes**
//! - Define **Deltas** (raw per-device changes reported by a poll)
//! - Define the long-poll **token** and **status report**
//! - Define **Events** (internal change events and outbound device events)
//! - Own value coercion: turning raw hub strings into typed values
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod attribute;
pub mod delta;
pub mod device;
pub mod event;
pub mod poll;
