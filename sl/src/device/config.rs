//! Device discovery configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for finding the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Explicit LED class directory (skips discovery)
    #[serde(rename = "led-path", skip_serializing_if = "Option::is_none")]
    pub led_path: Option<PathBuf>,

    /// Explicit evdev node for the touchpad (skips discovery)
    #[serde(rename = "touch-path", skip_serializing_if = "Option::is_none")]
    pub touch_path: Option<PathBuf>,

    /// Suffix of the light bar entry under the LED class
    #[serde(rename = "led-suffix")]
    pub led_suffix: String,

    /// Input device name of the touchpad
    #[serde(rename = "touchpad-name")]
    pub touchpad_name: String,

    /// Root of the LED class
    #[serde(rename = "leds-root")]
    pub leds_root: PathBuf,

    /// Root of the input class
    #[serde(rename = "input-root")]
    pub input_root: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            led_path: None,
            touch_path: None,
            led_suffix: ":rgb:indicator".to_string(),
            touchpad_name: "DualSense Wireless Controller Touchpad".to_string(),
            leds_root: PathBuf::from("/sys/class/leds"),
            input_root: PathBuf::from("/sys/class/input"),
        }
    }
}
