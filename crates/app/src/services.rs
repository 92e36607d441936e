//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod change_detector;
pub mod device_cache;
pub mod dispatcher;
pub mod status_poller;
pub mod sync_loop;
