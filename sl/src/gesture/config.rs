//! Gesture polling configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the GestureWatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Touch sampling interval in milliseconds
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Forget the last position when the finger lifts
    ///
    /// Off by default: the last position carries across lifts, so the first
    /// sample of a new touch is compared against where the previous one ended.
    #[serde(rename = "reset-on-release")]
    pub reset_on_release: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            reset_on_release: false,
        }
    }
}

impl GestureConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
