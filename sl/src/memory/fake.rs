//! In-memory process for unit tests

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use super::{MemoryError, ProcessLocator, ProcessMemory};

#[derive(Debug, Default)]
struct FakeState {
    running: bool,
    exited: bool,
    attaches: u32,
    cells: HashMap<(u64, usize), Vec<u8>>,
}

/// Scriptable process: reads succeed only for exact `(address, size)` pairs that were set
#[derive(Debug, Clone, Default)]
pub struct FakeProcess {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the process visible to `attach`
    pub fn launch(&self) {
        let mut state = self.state.lock().unwrap();
        state.running = true;
        state.exited = false;
    }

    /// Make reads through existing handles fail with `Gone` and hide the process
    pub fn exit(&self) {
        let mut state = self.state.lock().unwrap();
        state.running = false;
        state.exited = true;
    }

    /// Store `value` little-endian at `address` for reads of `size` bytes
    pub fn set(&self, address: u64, size: usize, value: u64) {
        let bytes = value.to_le_bytes()[..size].to_vec();
        self.state.lock().unwrap().cells.insert((address, size), bytes);
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().cells.clear();
    }

    pub fn attaches(&self) -> u32 {
        self.state.lock().unwrap().attaches
    }
}

impl ProcessMemory for FakeProcess {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>, MemoryError> {
        let state = self.state.lock().unwrap();
        if state.exited {
            return Err(MemoryError::Gone { pid: 4242 });
        }
        state.cells.get(&(address, size)).cloned().ok_or_else(|| MemoryError::Read {
            address,
            size,
            source: io::Error::other("bad address"),
        })
    }

    fn pid(&self) -> u32 {
        4242
    }
}

impl ProcessLocator for FakeProcess {
    type Handle = FakeProcess;

    fn attach(&self, name: &str) -> Result<FakeProcess, MemoryError> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(MemoryError::NotFound(name.to_string()));
        }
        state.attaches += 1;
        Ok(self.clone())
    }
}
