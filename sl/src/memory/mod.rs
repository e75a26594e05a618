//! Reading another process's memory
//!
//! [`ProcessLocator`] attaches to a process by name and hands out a
//! [`ProcessMemory`] handle that reads raw bytes at absolute addresses.
//! The Linux binding finds the process through `/proc` and reads with
//! `process_vm_readv`.

#[cfg(test)]
pub(crate) mod fake;
mod procfs;

use std::io;

use thiserror::Error;

pub use procfs::{ProcfsLocator, ProcfsProcess};

/// Errors from process memory operations
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Process not found: {0}")]
    NotFound(String),

    #[error("Process {pid} has exited")]
    Gone { pid: u32 },

    #[error("Read of {size} bytes at {address:#x} failed: {source}")]
    Read {
        address: u64,
        size: usize,
        #[source]
        source: io::Error,
    },

    #[error("Short read at {address:#x}: wanted {wanted} bytes, got {got}")]
    ShortRead { address: u64, wanted: usize, got: usize },
}

impl MemoryError {
    /// Whether the handle that produced this error is permanently unusable
    pub fn is_detached(&self) -> bool {
        matches!(self, MemoryError::Gone { .. })
    }
}

/// Read access to an attached process
pub trait ProcessMemory: Send {
    /// Read exactly `size` bytes at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>, MemoryError>;

    /// Identifier of the attached process, for logging
    fn pid(&self) -> u32;
}

/// Attaches to processes by name
pub trait ProcessLocator: Send {
    type Handle: ProcessMemory;

    /// Attach to the first process called `name`
    fn attach(&self, name: &str) -> Result<Self::Handle, MemoryError>;
}
