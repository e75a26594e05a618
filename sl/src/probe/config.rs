//! Probe configuration: target process, candidate layout and cadence

use std::fmt;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Absolute address in the target process
///
/// Accepts a YAML integer or a `0x`-prefixed hex string; always written back as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u64);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an address as an integer or a hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Address, E> {
                Ok(Address(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Address, E> {
                u64::try_from(v)
                    .map(Address)
                    .map_err(|_| E::custom(format!("negative address: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Address, E> {
                let trimmed = v.trim();
                let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
                    Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
                    None => trimmed.replace('_', "").parse(),
                };
                parsed
                    .map(Address)
                    .map_err(|e| E::custom(format!("invalid address '{}': {}", v, e)))
            }
        }

        deserializer.deserialize_any(AddressVisitor)
    }
}

/// Byte width of a little-endian unsigned counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Width {
    Two,
    Four,
}

impl Width {
    pub fn bytes(&self) -> usize {
        match self {
            Width::Two => 2,
            Width::Four => 4,
        }
    }

    /// Decode a little-endian unsigned value of this width
    ///
    /// Returns `None` when the buffer length does not match the width.
    pub fn decode_le(&self, bytes: &[u8]) -> Option<u64> {
        match self {
            Width::Two => bytes.try_into().ok().map(|b: [u8; 2]| u64::from(u16::from_le_bytes(b))),
            Width::Four => bytes.try_into().ok().map(|b: [u8; 4]| u64::from(u32::from_le_bytes(b))),
        }
    }
}

impl TryFrom<u8> for Width {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Width::Two),
            4 => Ok(Width::Four),
            other => Err(format!("unsupported counter width {} (expected 2 or 4)", other)),
        }
    }
}

impl From<Width> for u8 {
    fn from(width: Width) -> Self {
        width.bytes() as u8
    }
}

/// One hypothesis about where the alert counter lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub address: Address,
    pub width: Width,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.width.bytes())
    }
}

/// Configuration for the AlertProbe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Name of the process holding the alert counter
    #[serde(rename = "process-name")]
    pub process_name: String,

    /// Candidate absolute addresses, tried in order
    pub addresses: Vec<Address>,

    /// Candidate widths, tried in order at each address
    pub widths: Vec<Width>,

    /// Exclusive upper bound for a plausible counter value
    #[serde(rename = "plausible-max")]
    pub plausible_max: u64,

    /// Delay between reads while attached
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Delay between attach attempts while the process is absent
    #[serde(rename = "attach-backoff-ms")]
    pub attach_backoff_ms: u64,

    /// Consecutive missed reads before the process handle is dropped and reacquired (0 never drops)
    #[serde(rename = "max-consecutive-misses")]
    pub max_consecutive_misses: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            process_name: "duckstation-qt".to_string(),
            addresses: vec![
                Address(0x000B_75B4),
                Address(0x080B_75B4),
                Address(0x800B_75B4),
                Address(0x100B_75B4),
            ],
            widths: vec![Width::Two, Width::Four],
            plausible_max: 10_000,
            poll_interval_ms: 100,
            attach_backoff_ms: 1000,
            max_consecutive_misses: 50,
        }
    }
}

impl ProbeConfig {
    /// Candidates in scan order: every width of the first address, then the next address
    pub fn candidates(&self) -> Vec<Candidate> {
        self.addresses
            .iter()
            .flat_map(|&address| self.widths.iter().map(move |&width| Candidate { address, width }))
            .collect()
    }

    /// Whether a decoded value falls inside `[0, plausible_max)`
    pub fn is_plausible(&self, value: u64) -> bool {
        value < self.plausible_max
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn attach_backoff(&self) -> Duration {
        Duration::from_millis(self.attach_backoff_ms)
    }
}
