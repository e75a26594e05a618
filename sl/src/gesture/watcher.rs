//! Gesture polling loop

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::GestureConfig;
use super::detector::GestureDetector;
use crate::arbiter::StatusArbiter;
use crate::config::PaletteConfig;
use crate::device::{Device, DeviceError};
use crate::domain::{Color, Swipe};

/// Polls the touchpad and applies swipes as manual overrides
pub struct GestureWatcher {
    config: GestureConfig,
    palette: PaletteConfig,
    device: Arc<dyn Device>,
    arbiter: StatusArbiter,
    detector: GestureDetector,
}

impl GestureWatcher {
    /// Create a new GestureWatcher
    pub fn new(config: GestureConfig, palette: PaletteConfig, device: Arc<dyn Device>, arbiter: StatusArbiter) -> Self {
        let detector = GestureDetector::new(config.reset_on_release);
        Self {
            config,
            palette,
            device,
            arbiter,
            detector,
        }
    }

    /// Steady color a swipe selects
    pub fn color_for(&self, swipe: Swipe) -> Color {
        match swipe {
            Swipe::Left => self.palette.stealth,
            Swipe::Right => self.palette.alert,
        }
    }

    /// Take one touch sample and apply any swipe it completes
    ///
    /// A device error is returned as-is: losing the controller ends the process.
    pub fn check_once(&mut self) -> Result<Option<Swipe>, DeviceError> {
        let sample = self.device.poll_touch()?;
        let Some(swipe) = self.detector.observe(sample) else {
            return Ok(None);
        };

        let color = self.color_for(swipe);
        self.arbiter.disarm(color);
        if let Err(e) = self.device.set_color(color) {
            warn!(error = %e, %color, "Failed to set swipe color");
        }
        info!(direction = %swipe, mode = swipe.mode(), %color, "Swipe detected");
        Ok(Some(swipe))
    }

    /// Run the gesture loop until the device fails
    pub async fn run(mut self) -> Result<(), DeviceError> {
        info!(
            interval_ms = self.config.poll_interval_ms,
            reset_on_release = self.config.reset_on_release,
            "GestureWatcher started"
        );

        loop {
            if let Err(e) = self.check_once() {
                debug!(error = %e, "GestureWatcher::run: device error, stopping");
                return Err(e);
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}
