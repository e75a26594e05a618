//! Alert counter polling
//!
//! The AlertProbe attaches to the game process, reads the alert counter
//! through a fixed list of candidate `(address, width)` pairs, and arms the
//! alarm whenever the counter goes up.

mod alert_probe;
mod config;
mod scan;

pub use alert_probe::{AlertProbe, ProbeTick};
pub use config::{Address, Candidate, ProbeConfig, Width};
pub use scan::{CandidateReading, Reading, ScanResult, inspect, scan};
