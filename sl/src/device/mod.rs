//! Controller light bar and touchpad access
//!
//! The [`Device`] trait is the seam between the three loops and the physical
//! controller. [`SysfsDevice`] binds it to the Linux `hid-playstation` driver:
//! the light bar through the multicolor LED class and the touchpad through evdev.

mod config;
#[cfg(test)]
pub(crate) mod fake;
mod sysfs;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Color, TouchSample};

pub use config::DeviceConfig;
pub use sysfs::SysfsDevice;

/// Errors from device operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Device disconnected")]
    Disconnected,
}

/// Handle to the controller
///
/// `set_color` is called from both the gesture loop and the flash loop, so
/// implementations must serialize concurrent calls internally if the
/// underlying primitive is not safe for them.
pub trait Device: Send + Sync {
    /// Latest state of the touch surface
    fn poll_touch(&self) -> Result<TouchSample, DeviceError>;

    /// Set the light bar color
    fn set_color(&self, color: Color) -> Result<(), DeviceError>;

    /// Release the controller on shutdown
    fn release(&self) -> Result<(), DeviceError>;
}
