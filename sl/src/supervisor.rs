//! Wiring of the gesture, probe and flash loops
//!
//! The three loops share nothing but the [`StatusArbiter`] and the device.
//! None of them has a stop signal: shutdown aborts the tasks where they
//! stand and then releases the device.

use std::sync::Arc;

use eyre::{Report, Result, eyre};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::arbiter::StatusArbiter;
use crate::config::Config;
use crate::device::{Device, DeviceError};
use crate::flash::FlashScheduler;
use crate::gesture::GestureWatcher;
use crate::memory::ProcessLocator;
use crate::probe::AlertProbe;

type LoopOutput = (&'static str, Result<(), DeviceError>);

/// Running set of loops
pub struct Supervisor {
    device: Arc<dyn Device>,
    arbiter: StatusArbiter,
    tasks: JoinSet<LoopOutput>,
}

impl Supervisor {
    /// Spawn the three loops on the current runtime
    pub fn start<L>(config: &Config, device: Arc<dyn Device>, locator: L) -> Self
    where
        L: ProcessLocator + 'static,
    {
        debug!("Supervisor::start: called");
        let arbiter = StatusArbiter::new(config.palette.stealth);
        let mut tasks = JoinSet::new();

        let flash = FlashScheduler::new(config.flash.clone(), config.palette, device.clone(), arbiter.clone());
        tasks.spawn(async move {
            flash.run().await;
            ("flash", Ok(()))
        });
        info!("FlashScheduler spawned");

        let probe = AlertProbe::new(config.probe.clone(), config.flash.duration(), locator, arbiter.clone());
        tasks.spawn(async move {
            probe.run().await;
            ("probe", Ok(()))
        });
        info!("AlertProbe spawned");

        let gesture = GestureWatcher::new(config.gesture.clone(), config.palette, device.clone(), arbiter.clone());
        tasks.spawn(async move { ("gesture", gesture.run().await) });
        info!("GestureWatcher spawned");

        Self { device, arbiter, tasks }
    }

    /// Shared alarm state, for inspection
    pub fn arbiter(&self) -> &StatusArbiter {
        &self.arbiter
    }

    /// Wait until any loop ends
    ///
    /// Only the gesture loop ends on its own, when the controller is lost.
    /// Cancel-safe, so it can sit in a `select!` next to signal handlers.
    pub async fn wait_for_failure(&mut self) -> Report {
        match self.tasks.join_next().await {
            Some(Ok((name, Ok(())))) => eyre!("{} loop ended unexpectedly", name),
            Some(Ok((name, Err(e)))) => Report::new(e).wrap_err(format!("{} loop failed", name)),
            Some(Err(e)) => eyre!("Loop task panicked: {}", e),
            None => eyre!("No loops running"),
        }
    }

    /// Abort every loop and release the device
    pub async fn shutdown(mut self) -> Result<()> {
        debug!("Supervisor::shutdown: aborting loops");
        self.tasks.shutdown().await;

        if let Err(e) = self.device.release() {
            error!(error = %e, "Failed to release controller");
            return Err(Report::new(e).wrap_err("Failed to release controller"));
        }
        info!("Controller released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeDevice;
    use crate::domain::{Color, TouchSample};
    use crate::memory::fake::FakeProcess;
    use crate::probe::Address;
    use std::time::Duration;
    use tokio::time::sleep;

    const ADDR: u64 = 0x000B_75B4;

    fn config() -> Config {
        let mut config = Config::default();
        config.probe.addresses = vec![Address(ADDR)];
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_flashes_then_settles() {
        let device = Arc::new(FakeDevice::new());
        let process = FakeProcess::new();
        process.launch();
        process.set(ADDR, 2, 5);

        let supervisor = Supervisor::start(&config(), device.clone(), process.clone());
        sleep(Duration::from_millis(500)).await;
        assert_eq!(device.colors(), vec![Color::BLUE]);

        process.set(ADDR, 2, 6);
        sleep(Duration::from_secs(2)).await;
        assert!(supervisor.arbiter().is_active());
        assert!(device.colors().contains(&Color::RED));

        sleep(Duration::from_secs(15)).await;
        assert!(!supervisor.arbiter().is_active());
        assert_eq!(device.last_color(), Some(Color::BLUE));

        supervisor.shutdown().await.unwrap();
        assert!(device.released());
    }

    #[tokio::test(start_paused = true)]
    async fn test_swipe_ends_flashing() {
        let device = Arc::new(FakeDevice::new());
        let process = FakeProcess::new();
        process.launch();
        process.set(ADDR, 2, 1);

        let supervisor = Supervisor::start(&config(), device.clone(), process.clone());
        sleep(Duration::from_millis(300)).await;
        process.set(ADDR, 2, 2);
        sleep(Duration::from_secs(1)).await;
        assert!(supervisor.arbiter().is_active());

        device.queue_touches([TouchSample::touching(800), TouchSample::touching(900)]);
        sleep(Duration::from_millis(500)).await;
        assert!(!supervisor.arbiter().is_active());
        assert_eq!(device.last_color(), Some(Color::RED));
        assert_eq!(supervisor.arbiter().render_view().steady, Color::RED);

        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_surfaces_as_failure() {
        let device = Arc::new(FakeDevice::new());
        let mut supervisor = Supervisor::start(&config(), device.clone(), FakeProcess::new());

        device.disconnect();
        let report = supervisor.wait_for_failure().await;
        assert!(report.to_string().contains("gesture"));

        supervisor.shutdown().await.unwrap();
        assert!(device.released());
    }
}
