//! StatusLight - reactive controller light bar for a running game
//!
//! Turns a DualSense light bar into a status light: a left swipe on the
//! touchpad holds blue ("Stealth"), a right swipe holds red ("Alert"), and a
//! rise in the game's alert counter flashes red/blue until the alarm times out
//! or the next swipe overrides it.
//!
//! # Architecture
//!
//! ```text
//!   GestureWatcher ──disarm(color)──┐
//!                                   ▼
//!   AlertProbe ─────arm(duration)──▶ StatusArbiter ──render_view──▶ FlashScheduler
//!                                  (Mutex<AlarmState>)                    │
//!   GestureWatcher ──set_color──▶ Device ◀──────────set_color─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`arbiter`] - Shared alarm state behind a single lock
//! - [`gesture`] - Touchpad swipe detection
//! - [`probe`] - Alert counter polling in the game process
//! - [`flash`] - Rendering of the alarm to the light bar
//! - [`device`] - Controller binding
//! - [`memory`] - Process memory binding
//! - [`supervisor`] - Wiring of the three loops
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod arbiter;
pub mod cli;
pub mod config;
pub mod device;
pub mod domain;
pub mod flash;
pub mod gesture;
pub mod memory;
pub mod probe;
pub mod supervisor;

// Re-export commonly used types
pub use arbiter::{AlarmPhase, AlarmState, RenderView, StatusArbiter};
pub use config::{Config, PaletteConfig};
pub use device::{Device, DeviceConfig, DeviceError, SysfsDevice};
pub use domain::{Color, Swipe, TouchSample};
pub use flash::{FlashConfig, FlashScheduler, Frame};
pub use gesture::{GestureConfig, GestureDetector, GestureWatcher};
pub use memory::{MemoryError, ProcessLocator, ProcessMemory, ProcfsLocator, ProcfsProcess};
pub use probe::{AlertProbe, Candidate, ProbeConfig, ProbeTick, ScanResult};
pub use supervisor::Supervisor;
