//! Flash rendering loop

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::config::FlashConfig;
use crate::arbiter::StatusArbiter;
use crate::config::PaletteConfig;
use crate::device::Device;
use crate::domain::Color;

/// What one scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Painted one flash color
    Flash(Color),
    /// Repainted the steady color after it changed under us
    Steady(Color),
    /// Light already shows the steady color
    Unchanged,
}

/// Renders the alarm state: Idle (steady color) or Flashing (alert/stealth)
pub struct FlashScheduler {
    config: FlashConfig,
    palette: PaletteConfig,
    device: Arc<dyn Device>,
    arbiter: StatusArbiter,
    /// Next flash frame shows the alert color
    alert_phase: bool,
    /// Last color this scheduler sent
    rendered: Option<Color>,
}

impl FlashScheduler {
    /// Create a new FlashScheduler
    pub fn new(config: FlashConfig, palette: PaletteConfig, device: Arc<dyn Device>, arbiter: StatusArbiter) -> Self {
        Self {
            config,
            palette,
            device,
            arbiter,
            alert_phase: true,
            rendered: None,
        }
    }

    /// Render one frame for `now`; returns the frame and how long to wait before the next
    pub fn tick_at(&mut self, now: Instant) -> (Frame, Duration) {
        let view = self.arbiter.render_view_at(now);

        if view.flashing {
            let color = if self.alert_phase {
                self.palette.alert
            } else {
                self.palette.stealth
            };
            self.alert_phase = !self.alert_phase;
            self.paint(color);
            return (Frame::Flash(color), self.config.interval());
        }

        // Every flashing episode starts on the alert color
        self.alert_phase = true;

        // The gesture loop paints directly; repainting only on mismatch keeps
        // its color while still correcting a flash frame that raced it
        if self.rendered == Some(view.steady) {
            return (Frame::Unchanged, self.config.idle_poll());
        }
        self.paint(view.steady);
        (Frame::Steady(view.steady), self.config.idle_poll())
    }

    pub fn tick(&mut self) -> (Frame, Duration) {
        self.tick_at(Instant::now())
    }

    fn paint(&mut self, color: Color) {
        match self.device.set_color(color) {
            Ok(()) => self.rendered = Some(color),
            Err(e) => {
                warn!(error = %e, %color, "Failed to set light bar color");
                self.rendered = None;
            }
        }
    }

    /// Run the flash loop for the life of the process
    pub async fn run(mut self) {
        info!(
            interval_ms = self.config.interval_ms,
            duration_ms = self.config.duration_ms,
            "FlashScheduler started"
        );

        loop {
            let (frame, wait) = self.tick();
            if !matches!(frame, Frame::Unchanged) {
                debug!(?frame, "FlashScheduler::run: rendered");
            }
            tokio::time::sleep(wait).await;
        }
    }
}
