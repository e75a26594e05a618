//! The alarm state machine guarded by the arbiter

use tokio::time::Instant;

use crate::domain::Color;

/// Where the alarm stands at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPhase {
    /// Not armed
    Idle,
    /// Armed and before the deadline
    Flashing,
    /// Still marked armed but the deadline has passed
    Expired,
}

/// Shared alarm state
///
/// `active` is advisory: flashing is `active && now < deadline`, so an alarm
/// nobody clears still stops at its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmState {
    active: bool,
    deadline: Instant,
    steady: Color,
}

impl AlarmState {
    pub fn new(steady: Color, now: Instant) -> Self {
        Self {
            active: false,
            deadline: now,
            steady,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Color held while not flashing
    pub fn steady(&self) -> Color {
        self.steady
    }

    /// Arm (or re-arm) until `deadline`
    pub fn arm(&mut self, deadline: Instant) {
        self.active = true;
        self.deadline = deadline;
    }

    /// Manual override: stop flashing and hold `steady`
    pub fn disarm(&mut self, steady: Color) {
        self.active = false;
        self.steady = steady;
    }

    /// Clear a lapsed alarm and fall back to `idle`
    pub fn expire(&mut self, idle: Color) {
        self.active = false;
        self.steady = idle;
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        self.active && now < self.deadline
    }

    pub fn phase_at(&self, now: Instant) -> AlarmPhase {
        match (self.active, now < self.deadline) {
            (false, _) => AlarmPhase::Idle,
            (true, true) => AlarmPhase::Flashing,
            (true, false) => AlarmPhase::Expired,
        }
    }
}
