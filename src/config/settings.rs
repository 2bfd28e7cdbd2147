use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// In-flight filesystem calls per available core. Scan tasks spend most of
/// their time parked on stat and readdir, so the blocking pool can run well
/// ahead of the CPU count.
const IO_PER_CORE: usize = 4;

/// Hard ceiling, kept below tokio's default of 512 blocking threads.
const MAX_CONCURRENT_IO: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Upper bound on filesystem calls in flight during a parallel scan.
    pub max_concurrent_io: usize,
}

impl Settings {
    pub fn with_concurrency(max_concurrent_io: usize) -> Self {
        Self {
            max_concurrent_io: max_concurrent_io.max(1),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let wanted = cores.saturating_mul(IO_PER_CORE).min(MAX_CONCURRENT_IO);
        Self::with_concurrency(within_fd_budget(wanted, open_file_limit()))
    }
}

/// Each in-flight call holds at most one descriptor: the directory being
/// listed or the file whose size is read. Half of the soft limit is left to
/// the rest of the process.
fn within_fd_budget(wanted: usize, fd_limit: Option<usize>) -> usize {
    match fd_limit {
        Some(limit) => wanted.min(limit / 2).max(1),
        None => wanted,
    }
}

#[cfg(unix)]
fn open_file_limit() -> Option<usize> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the struct it is handed.
    let ret = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) };
    (ret == 0 && rlim.rlim_cur != libc::RLIM_INFINITY).then(|| rlim.rlim_cur as usize)
}

#[cfg(not(unix))]
fn open_file_limit() -> Option<usize> {
    None
}
