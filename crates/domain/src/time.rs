//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to change events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current time as whole seconds since the unix epoch.
#[must_use]
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}
