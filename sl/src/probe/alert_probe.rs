//! Alert counter probe implementation

use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::ProbeConfig;
use super::scan::{ScanResult, scan};
use crate::arbiter::StatusArbiter;
use crate::memory::{ProcessLocator, ProcessMemory};

/// What one probe tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTick {
    /// Process not running; the next attach waits for the backoff
    NotAttached,
    /// First value of the session, stored without arming
    Baseline(u64),
    /// Counter rose; the alarm was armed
    Alert { previous: u64, current: u64 },
    /// Counter unchanged
    Unchanged(u64),
    /// Counter went down (game restarted or reloaded); stored as the new baseline
    Lowered { previous: u64, current: u64 },
    /// No candidate gave a plausible value
    Miss { consecutive: u32 },
    /// Handle dropped; the next tick reattaches
    Detached,
}

/// Polls the game process and arms the alarm on every counter rise
pub struct AlertProbe<L: ProcessLocator> {
    config: ProbeConfig,
    flash_duration: Duration,
    locator: L,
    arbiter: StatusArbiter,
    handle: Option<L::Handle>,
    last_value: Option<u64>,
    misses: u32,
}

impl<L: ProcessLocator> AlertProbe<L> {
    /// Create a new AlertProbe; arming holds the alarm for `flash_duration`
    pub fn new(config: ProbeConfig, flash_duration: Duration, locator: L, arbiter: StatusArbiter) -> Self {
        Self {
            config,
            flash_duration,
            locator,
            arbiter,
            handle: None,
            last_value: None,
            misses: 0,
        }
    }

    /// Attach if needed, read the counter once and act on it
    pub fn tick(&mut self) -> ProbeTick {
        if self.handle.is_none() {
            match self.locator.attach(&self.config.process_name) {
                Ok(handle) => {
                    info!(pid = handle.pid(), process = %self.config.process_name, "Attached to game process");
                    self.handle = Some(handle);
                }
                Err(e) => {
                    debug!(error = %e, "AlertProbe::tick: attach failed");
                    return ProbeTick::NotAttached;
                }
            }
        }

        let Some(handle) = self.handle.as_ref() else {
            return ProbeTick::NotAttached;
        };

        match scan(handle, &self.config) {
            ScanResult::Value { candidate, value } => {
                debug!(%candidate, value, "AlertProbe::tick: read counter");
                self.misses = 0;
                self.observe(value)
            }
            ScanResult::Miss => {
                self.misses += 1;
                let limit = self.config.max_consecutive_misses;
                if limit > 0 && self.misses >= limit {
                    warn!(misses = self.misses, "No plausible counter for too long, reattaching");
                    self.detach();
                    return ProbeTick::Detached;
                }
                ProbeTick::Miss {
                    consecutive: self.misses,
                }
            }
            ScanResult::Detached => {
                warn!("Game process exited");
                self.detach();
                ProbeTick::Detached
            }
        }
    }

    /// Compare a fresh reading against the stored baseline
    ///
    /// The baseline always moves to `value`; only a strict rise arms.
    pub fn observe(&mut self, value: u64) -> ProbeTick {
        match self.last_value.replace(value) {
            None => {
                info!(value, "Alert counter baseline");
                ProbeTick::Baseline(value)
            }
            Some(previous) if value > previous => {
                let deadline = self.arbiter.arm(self.flash_duration);
                info!(previous, current = value, ?deadline, "Alert counter rose, flashing");
                ProbeTick::Alert {
                    previous,
                    current: value,
                }
            }
            Some(previous) if value == previous => ProbeTick::Unchanged(value),
            Some(previous) => {
                info!(previous, current = value, "Alert counter went down, new baseline");
                ProbeTick::Lowered {
                    previous,
                    current: value,
                }
            }
        }
    }

    /// Drop the handle and start a new session on the next attach
    fn detach(&mut self) {
        self.handle = None;
        self.last_value = None;
        self.misses = 0;
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn last_value(&self) -> Option<u64> {
        self.last_value
    }

    /// Run the probe loop for the life of the process
    pub async fn run(mut self) {
        info!(
            process = %self.config.process_name,
            candidates = self.config.candidates().len(),
            interval_ms = self.config.poll_interval_ms,
            "AlertProbe started"
        );

        loop {
            let wait = match self.tick() {
                ProbeTick::NotAttached => self.config.attach_backoff(),
                _ => self.config.poll_interval(),
            };
            tokio::time::sleep(wait).await;
        }
    }
}
