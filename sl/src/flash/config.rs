//! Flash timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the FlashScheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    /// How long an alert keeps flashing, in milliseconds
    #[serde(rename = "duration-ms")]
    pub duration_ms: u64,

    /// Time each flash color is held, in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Re-check interval while idle, in milliseconds
    #[serde(rename = "idle-poll-ms")]
    pub idle_poll_ms: u64,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            duration_ms: 15_000,
            interval_ms: 250,
            idle_poll_ms: 50,
        }
    }
}

impl FlashConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlashConfig::default();
        assert_eq!(config.duration(), Duration::from_secs(15));
        assert_eq!(config.interval(), Duration::from_millis(250));
        assert_eq!(config.idle_poll(), Duration::from_millis(50));
    }
}
