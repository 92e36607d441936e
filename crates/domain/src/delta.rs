//! Raw per-device deltas as reported by one status poll.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::DeviceId;

/// Variable whose presence in a delta forces every variable to count as changed.
///
/// Pressing the same scene button twice reports the same value twice; both
/// presses must still fire.
pub const SCENE_ACTIVATED: &str = "sl_SceneActivated";

/// Ordered `variable -> raw value` mapping built from one delta.
pub type DeltaMap = IndexMap<String, String>;

/// One `{variable, value}` pair exactly as the hub reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawState {
    pub variable: String,
    pub value: String,
}

impl RawState {
    #[must_use]
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

/// The subset of a device's variables that changed since the last poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDelta {
    pub device: DeviceId,
    pub states: Vec<RawState>,
}

impl RawDelta {
    #[must_use]
    pub fn new(device: DeviceId, states: Vec<RawState>) -> Self {
        Self { device, states }
    }

    /// Build the ordered mapping of this delta's variables.
    ///
    /// A variable reported twice keeps its first position and its last value.
    #[must_use]
    pub fn to_map(&self) -> DeltaMap {
        self.states
            .iter()
            .map(|state| (state.variable.clone(), state.value.clone()))
            .collect()
    }
}
