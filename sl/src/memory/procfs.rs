//! `/proc` process lookup and `process_vm_readv` reads

use std::fs;
use std::io::IoSliceMut;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::uio::{RemoteIoVec, process_vm_readv};
use nix::unistd::Pid;
use tracing::debug;

use super::{MemoryError, ProcessLocator, ProcessMemory};

/// Kernel limit on `/proc/<pid>/comm` (TASK_COMM_LEN - 1)
const COMM_MAX: usize = 15;

/// Finds processes by scanning a procfs mount
#[derive(Debug, Clone)]
pub struct ProcfsLocator {
    proc_root: PathBuf,
}

impl Default for ProcfsLocator {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcfsLocator {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Lowest pid whose comm or argv[0] basename matches `name`
    pub fn find_pid(&self, name: &str) -> Option<u32> {
        let entries = fs::read_dir(&self.proc_root).ok()?;
        let mut pids: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
            .collect();
        pids.sort_unstable();

        pids.into_iter()
            .find(|pid| process_matches(&self.proc_root.join(pid.to_string()), name))
    }
}

impl ProcessLocator for ProcfsLocator {
    type Handle = ProcfsProcess;

    fn attach(&self, name: &str) -> Result<ProcfsProcess, MemoryError> {
        let pid = self
            .find_pid(name)
            .ok_or_else(|| MemoryError::NotFound(name.to_string()))?;
        debug!(pid, %name, "ProcfsLocator::attach: found process");
        Ok(ProcfsProcess { pid })
    }
}

fn process_matches(proc_dir: &Path, name: &str) -> bool {
    if let Ok(comm) = fs::read_to_string(proc_dir.join("comm")) {
        let comm = comm.trim_end_matches('\n');
        if comm == name || (comm.len() == COMM_MAX && name.starts_with(comm)) {
            return true;
        }
    }

    // comm is truncated and may be rewritten by the process; argv[0] is the fallback
    fs::read(proc_dir.join("cmdline"))
        .ok()
        .and_then(|cmdline| {
            let argv0 = cmdline.split(|&b| b == 0).next()?.to_vec();
            let argv0 = String::from_utf8(argv0).ok()?;
            let base = Path::new(&argv0).file_name()?.to_str()?.to_string();
            Some(base == name)
        })
        .unwrap_or(false)
}

/// Attached process read through `process_vm_readv`
#[derive(Debug, Clone, Copy)]
pub struct ProcfsProcess {
    pid: u32,
}

impl ProcessMemory for ProcfsProcess {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buf = vec![0u8; size];
        let remote = [RemoteIoVec {
            base: address as usize,
            len: size,
        }];
        let read = {
            let mut local = [IoSliceMut::new(&mut buf)];
            process_vm_readv(Pid::from_raw(self.pid as i32), &mut local, &remote)
        };

        match read {
            Ok(got) if got == size => Ok(buf),
            Ok(got) => Err(MemoryError::ShortRead {
                address,
                wanted: size,
                got,
            }),
            Err(Errno::ESRCH) => Err(MemoryError::Gone { pid: self.pid }),
            Err(errno) => Err(MemoryError::Read {
                address,
                size,
                source: errno.into(),
            }),
        }
    }

    fn pid(&self) -> u32 {
        self.pid
    }
}
