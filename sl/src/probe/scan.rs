//! Candidate scan over a process handle

use std::fmt;

use super::config::{Candidate, ProbeConfig};
use crate::memory::{MemoryError, ProcessMemory};

/// Outcome of scanning every candidate once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// First candidate that produced a plausible value
    Value { candidate: Candidate, value: u64 },
    /// No candidate produced a plausible value
    Miss,
    /// The process behind the handle is gone
    Detached,
}

/// Scan candidates in order, stopping at the first plausible value
pub fn scan<M: ProcessMemory + ?Sized>(memory: &M, config: &ProbeConfig) -> ScanResult {
    for candidate in config.candidates() {
        match read_candidate(memory, candidate) {
            Ok(value) if config.is_plausible(value) => return ScanResult::Value { candidate, value },
            Ok(_) => {}
            Err(e) if e.is_detached() => return ScanResult::Detached,
            Err(_) => {}
        }
    }
    ScanResult::Miss
}

fn read_candidate<M: ProcessMemory + ?Sized>(memory: &M, candidate: Candidate) -> Result<u64, MemoryError> {
    let size = candidate.width.bytes();
    let bytes = memory.read_bytes(candidate.address.0, size)?;
    candidate.width.decode_le(&bytes).ok_or(MemoryError::ShortRead {
        address: candidate.address.0,
        wanted: size,
        got: bytes.len(),
    })
}

/// How one candidate read went
#[derive(Debug)]
pub enum Reading {
    Plausible(u64),
    OutOfRange(u64),
    Failed(MemoryError),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Plausible(value) => write!(f, "{}", value),
            Reading::OutOfRange(value) => write!(f, "{} (out of range)", value),
            Reading::Failed(e) => write!(f, "error: {}", e),
        }
    }
}

/// One candidate with its reading
#[derive(Debug)]
pub struct CandidateReading {
    pub candidate: Candidate,
    pub reading: Reading,
}

/// Read every candidate without stopping, for diagnostics
pub fn inspect<M: ProcessMemory + ?Sized>(memory: &M, config: &ProbeConfig) -> Vec<CandidateReading> {
    config
        .candidates()
        .into_iter()
        .map(|candidate| {
            let reading = match read_candidate(memory, candidate) {
                Ok(value) if config.is_plausible(value) => Reading::Plausible(value),
                Ok(value) => Reading::OutOfRange(value),
                Err(e) => Reading::Failed(e),
            };
            CandidateReading { candidate, reading }
        })
        .collect()
}
