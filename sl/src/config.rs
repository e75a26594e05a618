//! StatusLight configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::device::DeviceConfig;
use crate::domain::Color;
use crate::flash::FlashConfig;
use crate::gesture::GestureConfig;
use crate::probe::ProbeConfig;

/// Main StatusLight configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Steady and flashing colors
    pub palette: PaletteConfig,

    /// Touchpad swipe detection
    pub gesture: GestureConfig,

    /// Game process alert counter polling
    pub probe: ProbeConfig,

    /// Alarm flashing
    pub flash: FlashConfig,

    /// Controller discovery
    pub device: DeviceConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Any failure here is ignored; the full load reports it once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Self::default_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Serialize the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".statuslight.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("statuslight").join("statuslight.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Colors used for the steady modes and the alarm flash
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Idle color, also shown after a left swipe
    pub stealth: Color,

    /// Flash color, also shown after a right swipe
    pub alert: Color,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            stealth: Color::BLUE,
            alert: Color::RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{Address, Width};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.log_level.is_none());
        assert_eq!(config.palette.stealth, Color::BLUE);
        assert_eq!(config.palette.alert, Color::RED);
        assert_eq!(config.gesture.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.flash.duration(), Duration::from_secs(15));
        assert_eq!(config.probe.plausible_max, 10_000);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug

palette:
  stealth: [0, 0, 128]
  alert: [200, 0, 0]

gesture:
  poll-interval-ms: 20
  reset-on-release: true

probe:
  process-name: "mednafen"
  addresses: [0x1000, "0x2000"]
  widths: [4]
  plausible-max: 500

flash:
  duration-ms: 5000
  interval-ms: 100
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.palette.stealth, Color::new(0, 0, 128));
        assert!(config.gesture.reset_on_release);
        assert_eq!(config.probe.process_name, "mednafen");
        assert_eq!(config.probe.addresses, vec![Address(0x1000), Address(0x2000)]);
        assert_eq!(config.probe.widths, vec![Width::Four]);
        assert_eq!(config.probe.plausible_max, 500);
        assert_eq!(config.flash.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
flash:
  duration-ms: 1000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.flash.duration(), Duration::from_secs(1));

        // Defaults for unspecified
        assert_eq!(config.flash.interval(), Duration::from_millis(250));
        assert_eq!(config.probe.widths, vec![Width::Two, Width::Four]);
        assert_eq!(config.probe.addresses.len(), 4);
        assert!(!config.gesture.reset_on_release);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "log-level: warn\nprobe:\n  poll-interval-ms: 250\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.probe.poll_interval(), Duration::from_millis(250));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.yml");

        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }

    #[test]
    fn test_yaml_round_trip_keeps_candidates() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("0x000B75B4"));

        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.probe.candidates(), config.probe.candidates());
    }
}
