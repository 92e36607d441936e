//! Long-poll protocol values: the version cursor, request parameters and the
//! decoded status report.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delta::RawDelta;
use crate::time::unix_now;

/// Cursor the hub uses to compute deltas since the last successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollToken {
    pub data_version: i64,
    pub load_time: i64,
}

impl PollToken {
    #[must_use]
    pub const fn new(data_version: i64, load_time: i64) -> Self {
        Self {
            data_version,
            load_time,
        }
    }

    /// Token used before the hub has answered once: version zero, load time now.
    #[must_use]
    pub fn baseline() -> Self {
        Self::new(0, unix_now())
    }
}

/// How long the hub may hold one status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollParams {
    /// Minimum time the hub waits before answering when nothing changed.
    pub min_delay: Duration,
    /// Maximum time the hub holds the request open waiting for a change.
    pub timeout: Duration,
}

impl PollParams {
    /// Parameters of the throwaway request that fetches the first token.
    pub const BASELINE: Self = Self::new(Duration::ZERO, Duration::ZERO);

    #[must_use]
    pub const fn new(min_delay: Duration, timeout: Duration) -> Self {
        Self { min_delay, timeout }
    }

    /// `MinimumDelay` query value, in milliseconds.
    #[must_use]
    pub fn min_delay_ms(&self) -> u128 {
        self.min_delay.as_millis()
    }

    /// `Timeout` query value, in whole seconds.
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

/// Decoded body of one status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// Token to send with the next poll.
    pub token: PollToken,
    /// Per-device deltas, when the hub reported any.
    pub devices: Option<Vec<RawDelta>>,
    /// Background job list, when the hub reported one.
    pub tasks: Option<serde_json::Value>,
}
