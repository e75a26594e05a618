//! Alarm flashing
//!
//! [`FlashScheduler`] renders the shared alarm state to the light bar: the
//! steady color while idle, alternating alert/stealth while armed.

mod config;
mod scheduler;

pub use config::FlashConfig;
pub use scheduler::{FlashScheduler, Frame};
