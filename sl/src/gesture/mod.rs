//! Touchpad swipe detection
//!
//! [`GestureDetector`] turns touch samples into left/right swipes.
//! [`GestureWatcher`] polls the device, and on every swipe disarms the alarm
//! and paints the swipe's steady color.

mod config;
mod detector;
mod watcher;

pub use config::GestureConfig;
pub use detector::GestureDetector;
pub use watcher::GestureWatcher;
