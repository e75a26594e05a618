//! Shared alarm state and the locking discipline around it
//!
//! The gesture, probe and flash loops never talk to each other directly.
//! They all go through one [`StatusArbiter`], which guards a single
//! [`AlarmState`] with a mutex held only for the check or update itself.
//! Whoever takes the lock last wins: there is no priority beyond ordering.

mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::domain::Color;

pub use state::{AlarmPhase, AlarmState};

/// What the flash loop should render right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderView {
    /// Alarm is armed and before its deadline
    pub flashing: bool,
    /// Color to hold while not flashing
    pub steady: Color,
}

/// Cloneable handle to the shared alarm state
#[derive(Debug, Clone)]
pub struct StatusArbiter {
    inner: Arc<Mutex<AlarmState>>,
    idle: Color,
}

impl StatusArbiter {
    /// Create the arbiter, disarmed, holding `idle` as the steady color
    pub fn new(idle: Color) -> Self {
        debug!(%idle, "StatusArbiter::new: called");
        Self {
            inner: Arc::new(Mutex::new(AlarmState::new(idle, Instant::now()))),
            idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AlarmState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm the alarm for `duration` from now; returns the new deadline
    pub fn arm(&self, duration: Duration) -> Instant {
        self.arm_at(Instant::now(), duration)
    }

    pub fn arm_at(&self, now: Instant, duration: Duration) -> Instant {
        let deadline = now + duration;
        self.lock().arm(deadline);
        debug!(?duration, "StatusArbiter::arm: armed");
        deadline
    }

    /// Disarm the alarm and hold `steady` from now on
    pub fn disarm(&self, steady: Color) {
        self.lock().disarm(steady);
        debug!(%steady, "StatusArbiter::disarm: disarmed");
    }

    /// Authoritative flashing predicate: armed and before the deadline
    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        self.lock().is_active_at(now)
    }

    /// Read the state for rendering, clearing an alarm whose deadline has lapsed
    pub fn render_view(&self) -> RenderView {
        self.render_view_at(Instant::now())
    }

    pub fn render_view_at(&self, now: Instant) -> RenderView {
        let mut state = self.lock();
        match state.phase_at(now) {
            AlarmPhase::Flashing => RenderView {
                flashing: true,
                steady: state.steady(),
            },
            AlarmPhase::Expired => {
                state.expire(self.idle);
                debug!("StatusArbiter::render_view: deadline lapsed, back to idle");
                RenderView {
                    flashing: false,
                    steady: self.idle,
                }
            }
            AlarmPhase::Idle => RenderView {
                flashing: false,
                steady: state.steady(),
            },
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AlarmState {
        *self.lock()
    }
}
